macro_rules! const_assert {
    ($($tt:tt)*) => {
        const _: () = ::core::assert!($($tt)*);
    }
}
pub(crate) use const_assert;

/// Asserts that every byte in `s` is a decimal digit in [0, 9].
///
/// Note that these are digit values, not ASCII digits.
#[track_caller]
pub(crate) const fn debug_assert_all_digits(s: &[u8]) {
    if !cfg!(debug_assertions) {
        return;
    }
    let mut i = 0;
    while i < s.len() {
        #[allow(clippy::indexing_slicing)] // `i < s.len()`
        let d = s[i];
        debug_assert!(d <= 9);
        i += 1;
    }
}
