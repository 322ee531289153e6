/// Parse a run of exactly eight ASCII digits, as yielded by
/// `chunks_exact(8)` over value text, in a single pass of word arithmetic.
/// Returns `None` when any byte is not a digit.
///
/// The digit check and the three multiply/shift folds follow
/// https://youtu.be/wlvKAT7SZIQ?si=EndNPTY6f8oEBS--&t=2426
#[inline]
pub(crate) fn parse_eight_digits(chunk: &[u8]) -> Option<u64> {
    let mut word = [0u8; 8];
    word.copy_from_slice(chunk);
    let val = u64::from_le_bytes(word);

    let is_digits = ((val & 0xF0F0_F0F0_F0F0_F0F0)
        | ((val.wrapping_add(0x0606_0606_0606_0606) & 0xF0F0_F0F0_F0F0_F0F0) >> 4))
        == 0x3333_3333_3333_3333;
    if !is_digits {
        return None;
    }

    let val = (val & 0x0F0F_0F0F_0F0F_0F0F).wrapping_mul(2561) >> 8;
    let val = (val & 0x00FF_00FF_00FF_00FF).wrapping_mul(6553601) >> 16;
    let val = (val & 0x0000_FFFF_0000_FFFF).wrapping_mul(42949672960001) >> 32;
    Some(val)
}
