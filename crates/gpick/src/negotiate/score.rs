use std::fmt;

use crate::{
    generic::{
        DeviceFeatures, DeviceProperties, DeviceScore, DeviceType, QueryError,
        QueueFamilyIndices, SwapchainSupport,
    },
    CapabilityQuery,
};

use super::{
    extension::{missing_extensions, SWAPCHAIN_EXTENSION},
    probe::probe_swapchain_support,
    queue::resolve_queue_families,
};

/// Default bonus for discrete devices.
pub const DISCRETE_BONUS: i64 = 1000;

/// What a device must provide to be considered suitable.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Requirements {
    /// Device extensions that must all be exposed.
    pub extensions: Vec<String>,

    /// Device features that must all be supported.
    pub features: DeviceFeatures,

    /// Score added for discrete devices.
    pub discrete_bonus: i64,
}

impl Default for Requirements {
    fn default() -> Self {
        Requirements {
            extensions: vec![SWAPCHAIN_EXTENSION.to_owned()],
            features: DeviceFeatures::GEOMETRY_SHADER,
            discrete_bonus: DISCRETE_BONUS,
        }
    }
}

/// Why a device scored zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// No graphics family or no family that can present to the surface.
    IncompleteQueueFamilies,

    MissingExtensions(Vec<String>),

    /// Surface reports no formats or no present modes for the device.
    InadequateSwapchain { formats: usize, present_modes: usize },

    MissingFeatures(DeviceFeatures),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::IncompleteQueueFamilies => {
                f.write_str("no queue family for graphics or presentation")
            }
            Rejection::MissingExtensions(names) => {
                write!(f, "missing extensions: {}", names.join(", "))
            }
            Rejection::InadequateSwapchain {
                formats,
                present_modes,
            } => write!(
                f,
                "inadequate swapchain support: {formats} formats, {present_modes} present modes"
            ),
            Rejection::MissingFeatures(features) => {
                f.write_str("missing features: ")?;
                bitflags::parser::to_writer(features, f)
            }
        }
    }
}

/// Outcome of scoring one device against one surface.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub properties: DeviceProperties,

    pub score: DeviceScore,

    pub queue_families: QueueFamilyIndices,

    /// Probed swapchain support.
    /// `None` if the device was rejected before probing.
    pub support: Option<SwapchainSupport>,

    /// Set when a suitability gate failed and the score was forced to zero.
    pub rejection: Option<Rejection>,
}

impl Evaluation {
    fn rejected(
        properties: DeviceProperties,
        queue_families: QueueFamilyIndices,
        support: Option<SwapchainSupport>,
        rejection: Rejection,
    ) -> Self {
        tracing::debug!(device = %properties.name, reason = %rejection, "Device rejected");

        Evaluation {
            properties,
            score: DeviceScore::UNSUITABLE,
            queue_families,
            support,
            rejection: Some(rejection),
        }
    }
}

/// Scores a device for presenting to `surface`.
///
/// Queue families, extensions, swapchain support and features are hard gates,
/// failing any of them yields exactly zero.
/// Device type and maximum image size only rank devices that pass every gate.
pub fn evaluate<Q>(
    query: &Q,
    device: Q::Device,
    surface: Q::Surface,
    requirements: &Requirements,
) -> Result<Evaluation, QueryError>
where
    Q: CapabilityQuery + ?Sized,
{
    let properties = query.properties(device);

    let queue_families = resolve_queue_families(query, device, surface)?;
    if !queue_families.is_complete() {
        return Ok(Evaluation::rejected(
            properties,
            queue_families,
            None,
            Rejection::IncompleteQueueFamilies,
        ));
    }

    let mut score = 0i64;

    if properties.device_type == DeviceType::DiscreteGpu {
        score = score.saturating_add(requirements.discrete_bonus);
    }

    // Larger textures correlate with the capability tier.
    score = score.saturating_add(i64::from(properties.max_image_dimension_2d));

    let missing = missing_extensions(query, device, &requirements.extensions)?;
    if !missing.is_empty() {
        return Ok(Evaluation::rejected(
            properties,
            queue_families,
            None,
            Rejection::MissingExtensions(missing),
        ));
    }

    let support = probe_swapchain_support(query, device, surface)?;
    if !support.is_adequate() {
        let rejection = Rejection::InadequateSwapchain {
            formats: support.formats.len(),
            present_modes: support.present_modes.len(),
        };
        return Ok(Evaluation::rejected(
            properties,
            queue_families,
            Some(support),
            rejection,
        ));
    }

    let missing = requirements.features.difference(query.features(device));
    if !missing.is_empty() {
        return Ok(Evaluation::rejected(
            properties,
            queue_families,
            Some(support),
            Rejection::MissingFeatures(missing),
        ));
    }

    tracing::debug!(device = %properties.name, score, "Device is suitable");

    Ok(Evaluation {
        properties,
        score: DeviceScore(score),
        queue_families,
        support: Some(support),
        rejection: None,
    })
}

/// Scores a device for presenting to `surface`.
///
/// See [`evaluate`].
pub fn score<Q>(
    query: &Q,
    device: Q::Device,
    surface: Q::Surface,
    requirements: &Requirements,
) -> Result<DeviceScore, QueryError>
where
    Q: CapabilityQuery + ?Sized,
{
    Ok(evaluate(query, device, surface, requirements)?.score)
}
