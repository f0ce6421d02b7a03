//! Core emulator primitives and traits.

pub mod logging;

pub mod types {
    use serde::{Deserialize, Serialize};

    /// Owned framebuffer snapshot handed from a system to its frontend
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; (width * height) as usize],
            }
        }

        /// Rows of `width` pixels, top to bottom
        pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
            self.pixels.chunks(self.width.max(1) as usize)
        }
    }
}

/// Description of a mount point (media slot) that a system supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPointInfo {
    /// Unique identifier for this mount point (e.g., "Program")
    pub id: String,
    /// User-friendly name for display (e.g., "Program ROM")
    pub name: String,
    /// File extensions accepted by this mount point (e.g., ["ch8", "c8"])
    pub extensions: Vec<String>,
    /// Whether this mount point is required for the system to function
    pub required: bool,
}

/// A high-level System trait tying components together.
pub trait System {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reset to initial power-on state
    fn reset(&mut self);

    /// Emulate until a frame is produced and return a framebuffer.
    fn step_frame(&mut self) -> Result<types::Frame, Self::Error>;

    /// Get the list of mount points this system supports
    fn mount_points(&self) -> Vec<MountPointInfo>;

    /// Load media into a specific mount point
    fn mount(&mut self, mount_point_id: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Unload media from a specific mount point
    fn unmount(&mut self, mount_point_id: &str) -> Result<(), Self::Error>;

    /// Check if a mount point has media loaded
    fn is_mounted(&self, mount_point_id: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_initialization() {
        let f = types::Frame::new(10, 4);
        assert_eq!(f.pixels.len(), 40);
        assert_eq!(f.width, 10);
        assert_eq!(f.height, 4);
        assert_eq!(f.rows().count(), 4);
        assert!(f.rows().all(|row| row.len() == 10));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error: {0}")]
    struct MockError(String);

    #[derive(Default)]
    struct MockSystem {
        media: Option<Vec<u8>>,
    }

    impl System for MockSystem {
        type Error = MockError;

        fn reset(&mut self) {}

        fn step_frame(&mut self) -> Result<types::Frame, Self::Error> {
            match &self.media {
                Some(_) => Ok(types::Frame::new(2, 2)),
                None => Err(MockError("nothing mounted".to_string())),
            }
        }

        fn mount_points(&self) -> Vec<MountPointInfo> {
            vec![MountPointInfo {
                id: "test".to_string(),
                name: "Test Slot".to_string(),
                extensions: vec!["bin".to_string()],
                required: true,
            }]
        }

        fn mount(&mut self, mount_point_id: &str, data: &[u8]) -> Result<(), Self::Error> {
            if mount_point_id != "test" {
                return Err(MockError(mount_point_id.to_string()));
            }
            self.media = Some(data.to_vec());
            Ok(())
        }

        fn unmount(&mut self, _mount_point_id: &str) -> Result<(), Self::Error> {
            self.media = None;
            Ok(())
        }

        fn is_mounted(&self, mount_point_id: &str) -> bool {
            mount_point_id == "test" && self.media.is_some()
        }
    }

    #[test]
    fn test_system_mount_points() {
        let sys = MockSystem::default();
        let mount_points = sys.mount_points();

        assert_eq!(mount_points.len(), 1);
        assert_eq!(mount_points[0].id, "test");
        assert_eq!(mount_points[0].name, "Test Slot");
        assert!(mount_points[0].required);
    }

    #[test]
    fn test_system_mount_operations() {
        let mut sys = MockSystem::default();
        assert!(!sys.is_mounted("test"));
        assert!(sys.step_frame().is_err());

        assert!(sys.mount("other", &[1]).is_err());
        assert!(sys.mount("test", &[1, 2, 3]).is_ok());
        assert!(sys.is_mounted("test"));
        assert_eq!(sys.step_frame().map(|f| f.pixels.len()).ok(), Some(4));

        assert!(sys.unmount("test").is_ok());
        assert!(!sys.is_mounted("test"));
    }
}
