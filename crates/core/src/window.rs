use std::ops::Range;

/// Rows shown around the cursor: `size` rows (fewer if the ledger is shorter), centred on
/// `cursor` where possible and shifted to stay inside the ledger.
pub fn window(cursor: usize, len: usize, size: usize) -> Range<usize> {
    let size = size.min(len);
    if size == 0 {
        return 0..0;
    }
    let cursor = cursor.min(len - 1);
    let start = cursor.saturating_sub(size / 2).min(len - size);
    start..start + size
}
