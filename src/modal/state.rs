/// Caller-owned open flag that drives a [`ModalController`](super::ModalController)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    is_open: bool,
}

impl ModalState {
    pub fn new(initial: bool) -> Self {
        Self { is_open: initial }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers() {
        let mut state = ModalState::default();
        assert!(!state.is_open());
        state.open();
        assert!(state.is_open());
        state.toggle();
        assert!(!state.is_open());
        state.set_open(true);
        state.close();
        assert!(!state.is_open());
        assert!(ModalState::new(true).is_open());
    }
}
