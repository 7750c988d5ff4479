/// Order items so incomplete entries come first, keeping each entry's
/// storage index alongside it.
///
/// Relative order inside the incomplete and complete groups is preserved.
/// The index is the position in `items`, which is what action URLs must
/// reference; the position in the returned vector is for display only.
pub fn sorted_for_display<T, F>(items: &[T], is_complete: F) -> Vec<(&T, usize)>
where
    F: Fn(&T) -> bool,
{
    let (complete, mut incomplete): (Vec<_>, Vec<_>) = items
        .iter()
        .enumerate()
        .map(|(index, item)| (item, index))
        .partition(|(item, _)| is_complete(*item));
    incomplete.extend(complete);
    incomplete
}
