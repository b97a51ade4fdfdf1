pub mod key_map {
    use std::collections::HashSet;

    use winit::event::ElementState;
    use winit::keyboard::KeyCode;

    /// Held keyboard keys, by physical key code
    pub struct KeyMap {
        pressed_keys: HashSet<KeyCode>,
    }

    impl KeyMap {
        pub fn new() -> Self {
            Self {
                pressed_keys: HashSet::new(),
            }
        }

        /// Records a key event and returns true if it is a fresh press.
        ///
        /// Repeated press events for a key that is already held return false,
        /// so toggles bound to a key flip once per physical press
        pub fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
            match state {
                ElementState::Pressed => self.pressed_keys.insert(key),
                ElementState::Released => {
                    self.pressed_keys.remove(&key);
                    false
                }
            }
        }

        /// Like [Self::handle_key], but synthetic events never count as a
        /// fresh press. The windowing system sends synthetic presses for keys
        /// already held when the window gains focus
        pub fn handle_event(&mut self, key: KeyCode, state: ElementState, is_synthetic: bool) -> bool {
            self.handle_key(key, state) && !is_synthetic
        }

        pub fn is_pressed(&self, key: KeyCode) -> bool {
            self.pressed_keys.contains(&key)
        }

        /// Forgets all held keys. Used when the window loses focus, since
        /// the matching release events are never delivered
        pub fn clear(&mut self) {
            self.pressed_keys.clear();
        }
    }

    mod key_map_std_traits {
        use super::KeyMap;
        impl Default for KeyMap {
            fn default() -> Self {
                Self::new()
            }
        }
    }

    #[cfg(test)]
    mod key_map_tests {
        use winit::event::ElementState;
        use winit::keyboard::KeyCode;

        use super::KeyMap;

        #[test]
        fn press_edge_test() {
            let mut map = KeyMap::new();
            assert!(map.handle_key(KeyCode::KeyS, ElementState::Pressed));
            // key repeat
            assert!(!map.handle_key(KeyCode::KeyS, ElementState::Pressed));
            assert!(map.is_pressed(KeyCode::KeyS));

            assert!(!map.handle_key(KeyCode::KeyS, ElementState::Released));
            assert!(!map.is_pressed(KeyCode::KeyS));

            assert!(map.handle_key(KeyCode::KeyS, ElementState::Pressed));
        }

        #[test]
        fn keys_are_independent() {
            let mut map = KeyMap::new();
            map.handle_key(KeyCode::ArrowLeft, ElementState::Pressed);
            map.handle_key(KeyCode::ShiftLeft, ElementState::Pressed);
            map.handle_key(KeyCode::ArrowLeft, ElementState::Released);

            assert!(!map.is_pressed(KeyCode::ArrowLeft));
            assert!(map.is_pressed(KeyCode::ShiftLeft));
            assert!(!map.is_pressed(KeyCode::ShiftRight));
        }

        #[test]
        fn release_without_press_is_ignored() {
            let mut map = KeyMap::new();
            assert!(!map.handle_key(KeyCode::Escape, ElementState::Released));
            assert!(!map.is_pressed(KeyCode::Escape));
        }

        #[test]
        fn clear_test() {
            let mut map = KeyMap::new();
            map.handle_key(KeyCode::ArrowUp, ElementState::Pressed);
            map.clear();
            assert!(!map.is_pressed(KeyCode::ArrowUp));
            // the next press is a fresh press again
            assert!(map.handle_key(KeyCode::ArrowUp, ElementState::Pressed));
        }

        #[test]
        fn synthetic_press_after_refocus_is_held_but_not_fresh() {
            let mut map = KeyMap::new();
            assert!(map.handle_event(KeyCode::Escape, ElementState::Pressed, false));
            map.clear();

            assert!(!map.handle_event(KeyCode::Escape, ElementState::Pressed, true));
            assert!(map.is_pressed(KeyCode::Escape));
            // still held, so a repeat is not fresh either
            assert!(!map.handle_event(KeyCode::Escape, ElementState::Pressed, false));

            assert!(!map.handle_event(KeyCode::Escape, ElementState::Released, false));
            assert!(map.handle_event(KeyCode::Escape, ElementState::Pressed, false));
        }
    }
}

pub use key_map::*;
