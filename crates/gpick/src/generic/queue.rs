use smallvec::SmallVec;

bitflags::bitflags! {
    /// Flags that describe the capabilities of a queue family.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct QueueFlags: u32 {
        /// The queue supports graphics operations.
        const GRAPHICS = 0x1;

        /// The queue supports compute operations.
        const COMPUTE = 0x2;

        /// The queue supports transfer operations.
        const TRANSFER = 0x4;

        /// The queue supports sparse memory binding.
        const SPARSE_BINDING = 0x8;
    }
}

/// Capabilities of a queue family of specific device.
#[derive(Clone, Debug)]
pub struct FamilyCapabilities {
    /// Flags that describe the capabilities of the queue family.
    pub queue_flags: QueueFlags,

    /// Number of queues that can be created in the queue family.
    pub queue_count: usize,
}

/// Queue families chosen for the graphics and presentation roles
/// of one device/surface pair.
///
/// Either index stays `None` until a matching family is found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct QueueFamilyIndices {
    /// First family that supports graphics operations.
    pub graphics: Option<u32>,

    /// First family that can present to the surface.
    pub present: Option<u32>,
}

/// How swapchain images are shared between queue families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SharingMode {
    /// Images are owned by one family at a time.
    Exclusive,

    /// Images are accessed concurrently by the listed families.
    Concurrent([u32; 2]),
}

impl QueueFamilyIndices {
    /// Returns `true` when both roles are assigned.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }

    /// Returns `(graphics, present)` when both roles are assigned.
    #[inline]
    pub fn complete(&self) -> Option<(u32, u32)> {
        Some((self.graphics?, self.present?))
    }

    /// Distinct family indices in ascending order.
    /// One queue is requested per returned family.
    pub fn unique(&self) -> SmallVec<[u32; 2]> {
        let mut families = SmallVec::new();
        families.extend(self.graphics);
        families.extend(self.present);
        families.sort_unstable();
        families.dedup();
        families
    }

    /// Sharing mode for swapchain images.
    ///
    /// Returns `None` if the indices are incomplete.
    pub fn sharing_mode(&self) -> Option<SharingMode> {
        let (graphics, present) = self.complete()?;
        if graphics == present {
            Some(SharingMode::Exclusive)
        } else {
            Some(SharingMode::Concurrent([graphics, present]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_requires_both_roles() {
        let mut indices = QueueFamilyIndices::default();
        assert!(!indices.is_complete());

        indices.graphics = Some(0);
        assert!(!indices.is_complete());
        assert_eq!(indices.complete(), None);

        indices.present = Some(2);
        assert!(indices.is_complete());
        assert_eq!(indices.complete(), Some((0, 2)));
    }

    #[test]
    fn shared_family_is_exclusive() {
        let indices = QueueFamilyIndices {
            graphics: Some(1),
            present: Some(1),
        };
        assert_eq!(indices.unique().as_slice(), &[1]);
        assert_eq!(indices.sharing_mode(), Some(SharingMode::Exclusive));
    }

    #[test]
    fn distinct_families_are_concurrent() {
        let indices = QueueFamilyIndices {
            graphics: Some(3),
            present: Some(0),
        };
        assert_eq!(indices.unique().as_slice(), &[0, 3]);
        assert_eq!(
            indices.sharing_mode(),
            Some(SharingMode::Concurrent([3, 0]))
        );
    }

    #[test]
    fn incomplete_has_no_sharing_mode() {
        let indices = QueueFamilyIndices {
            graphics: None,
            present: Some(0),
        };
        assert_eq!(indices.sharing_mode(), None);
        assert_eq!(indices.unique().as_slice(), &[0]);
    }
}
