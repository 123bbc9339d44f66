//! The seam between the core and whatever owns the real window.
//!
//! The renderer never talks to a windowing library directly: hosts
//! translate their native events into [`Key`] presses and carry out the
//! window operations the renderer requests through [`WindowHost`].

use glam::UVec2;

/// Keys the viewer reacts to. Hosts translate their native key codes and
/// forward only these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Close the window.
    Escape,
    /// Toggle between fitted-preview and native image size.
    Tab,
    /// Toggle window border visibility.
    B,
}

/// Window operations the renderer requests from its host.
///
/// Implemented over the live window by the event-loop glue; tests use an
/// in-memory recorder.
pub trait WindowHost {
    /// Requests a new inner window size in physical pixels.
    fn set_size(&mut self, size: UVec2);

    /// Shows or hides the window border.
    fn set_border_visible(&mut self, visible: bool);

    /// Asks the event loop to close the window.
    fn request_close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullHost;

    impl WindowHost for NullHost {
        fn set_size(&mut self, _size: UVec2) {}
        fn set_border_visible(&mut self, _visible: bool) {}
        fn request_close(&mut self) {}
    }

    #[test]
    fn window_host_is_object_safe() {
        let mut host: Box<dyn WindowHost> = Box::new(NullHost);
        host.set_size(UVec2::new(640, 480));
        host.set_border_visible(false);
        host.request_close();
    }

    #[test]
    fn key_is_copy_and_comparable() {
        let key = Key::Tab;
        let copy = key;
        assert_eq!(key, copy);
        assert_ne!(Key::Escape, Key::B);
    }
}
