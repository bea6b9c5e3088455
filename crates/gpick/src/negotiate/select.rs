use crate::{
    generic::{
        DeviceProperties, DeviceScore, NoSuitableDeviceError, QueryError, QueueFamilyIndices,
        SelectError, SwapchainSupport,
    },
    CapabilityQuery,
};

use super::score::{evaluate, Evaluation, Requirements};

/// Enumerated device together with its evaluation.
#[derive(Clone, Debug)]
pub struct Candidate<D> {
    /// Position in platform enumeration order.
    pub index: usize,
    pub device: D,
    pub evaluation: Evaluation,
}

/// Device chosen for rendering and presentation.
#[derive(Clone, Debug)]
pub struct Selection<D> {
    /// Position in platform enumeration order.
    pub index: usize,
    pub device: D,
    pub properties: DeviceProperties,
    pub score: DeviceScore,

    /// Always complete.
    pub queue_families: QueueFamilyIndices,

    /// Always adequate.
    pub support: SwapchainSupport,
}

/// Evaluates every enumerated device and orders them from best to worst.
///
/// Equal scores keep enumeration order.
pub fn rank_devices<Q>(
    query: &Q,
    surface: Q::Surface,
    requirements: &Requirements,
) -> Result<Vec<Candidate<Q::Device>>, QueryError>
where
    Q: CapabilityQuery + ?Sized,
{
    let mut candidates = query
        .devices()?
        .into_iter()
        .enumerate()
        .map(|(index, device)| {
            let evaluation = evaluate(query, device, surface, requirements)?;
            Ok(Candidate {
                index,
                device,
                evaluation,
            })
        })
        .collect::<Result<Vec<_>, QueryError>>()?;

    // Stable sort, ties stay in enumeration order.
    candidates.sort_by(|a, b| b.evaluation.score.cmp(&a.evaluation.score));
    Ok(candidates)
}

/// Picks the highest scoring device.
///
/// Among devices with equal score the one enumerated first wins.
/// Fails if no device has a positive score.
pub fn select_device<Q>(
    query: &Q,
    surface: Q::Surface,
    requirements: &Requirements,
) -> Result<Selection<Q::Device>, SelectError>
where
    Q: CapabilityQuery + ?Sized,
{
    let candidates = rank_devices(query, surface, requirements)?;
    let count = candidates.len();

    let winner = candidates
        .into_iter()
        .next()
        .filter(|candidate| candidate.evaluation.score.is_suitable());

    match winner {
        Some(Candidate {
            index,
            device,
            evaluation:
                Evaluation {
                    properties,
                    score,
                    queue_families,
                    support: Some(support),
                    rejection: None,
                },
        }) => {
            tracing::info!(
                device = %properties.name,
                device_type = %properties.device_type,
                api = %properties.api_version,
                %score,
                "Selected device"
            );

            Ok(Selection {
                index,
                device,
                properties,
                score,
                queue_families,
                support,
            })
        }
        _ => {
            tracing::error!(candidates = count, "No suitable device");
            Err(NoSuitableDeviceError { candidates: count }.into())
        }
    }
}
