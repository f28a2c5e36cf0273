//! Shared event tagging helpers used across crates.
//!
//! We tag injected key events with a process-unique marker value in the
//! `dwExtraInfo` field so our keyboard hook can ignore them.

/// 'dkfc' in ASCII bytes: 0x64 0x6b 0x66 0x63 -> 1684760163
pub const DOCKFOCUS_TAG: usize = 1_684_760_163;

/// True if an event's extra-info field carries our marker.
pub fn is_tagged(extra_info: usize) -> bool {
    extra_info == DOCKFOCUS_TAG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_spells_dkfc() {
        assert_eq!((DOCKFOCUS_TAG as u32).to_be_bytes(), *b"dkfc");
    }

    #[test]
    fn only_marker_is_tagged() {
        assert!(is_tagged(DOCKFOCUS_TAG));
        assert!(!is_tagged(0));
        assert!(!is_tagged(DOCKFOCUS_TAG + 1));
    }
}
