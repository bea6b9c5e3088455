use crate::{
    generic::{QueryError, QueueFamilyIndices, QueueFlags},
    CapabilityQuery,
};

/// Finds queue families for the graphics and presentation roles.
///
/// Families are visited in index order and the first family that qualifies
/// for a role gets it. Both roles may end up on the same family.
/// The scan stops as soon as both roles are assigned.
///
/// An incomplete result is not an error, callers treat it as unsuitable.
pub fn resolve_queue_families<Q>(
    query: &Q,
    device: Q::Device,
    surface: Q::Surface,
) -> Result<QueueFamilyIndices, QueryError>
where
    Q: CapabilityQuery + ?Sized,
{
    let mut indices = QueueFamilyIndices::default();

    for (idx, family) in query.queue_families(device).iter().enumerate() {
        let idx = idx as u32;

        if indices.graphics.is_none() && family.queue_flags.contains(QueueFlags::GRAPHICS) {
            indices.graphics = Some(idx);
        }

        if indices.present.is_none() && query.supports_present(device, idx, surface)? {
            indices.present = Some(idx);
        }

        if indices.is_complete() {
            break;
        }
    }

    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generic::QueryErrorKind,
        negotiate::mock::{MockDevice, MockQuery},
    };

    const G: QueueFlags = QueueFlags::GRAPHICS;
    const C: QueueFlags = QueueFlags::COMPUTE;
    const T: QueueFlags = QueueFlags::TRANSFER;

    fn resolve(device: MockDevice) -> QueueFamilyIndices {
        resolve_queue_families(&MockQuery::new([device]), 0, ()).unwrap()
    }

    #[test]
    fn single_family_serves_both_roles() {
        let indices = resolve(MockDevice::suitable("a").with_families(&[(G | C, true)]));
        assert_eq!(indices.graphics, Some(0));
        assert_eq!(indices.present, Some(0));
    }

    #[test]
    fn lowest_qualifying_index_wins() {
        let indices = resolve(MockDevice::suitable("a").with_families(&[
            (T, false),
            (G, false),
            (C, true),
            (G | C, true),
            (G, true),
        ]));
        assert_eq!(indices.graphics, Some(1));
        assert_eq!(indices.present, Some(2));
    }

    #[test]
    fn roles_are_resolved_independently() {
        // The present-capable family has no graphics bit.
        let indices = resolve(MockDevice::suitable("a").with_families(&[(C, true), (G, false)]));
        assert_eq!(indices.graphics, Some(1));
        assert_eq!(indices.present, Some(0));
        assert!(indices.is_complete());
    }

    #[test]
    fn missing_present_support_is_incomplete() {
        let indices = resolve(MockDevice::suitable("a").with_families(&[(G, false), (C, false)]));
        assert_eq!(indices.graphics, Some(0));
        assert_eq!(indices.present, None);
        assert!(!indices.is_complete());
    }

    #[test]
    fn no_families_is_empty() {
        let indices = resolve(MockDevice::suitable("a").with_families(&[]));
        assert_eq!(indices, QueueFamilyIndices::default());
    }

    #[test]
    fn query_failure_propagates() {
        let mut device = MockDevice::suitable("a");
        device.lost_surface = true;

        let err = resolve_queue_families(&MockQuery::new([device]), 0, ()).unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::SurfaceLost);
    }
}
