//! In-line insertion and deletion at a cursor.
//!
//! Every operation re-resolves the cursor's grid column against the current line before touching
//! it, so a cursor computed before an earlier edit still lands on the right character. Each
//! returns the cursor after the edit, or `None` when nothing changed.

use tracing::trace;

use crate::grid::{CursorPosition, resolve_char_index};
use crate::line::Line;
use crate::storage::LineStore;

fn ensure_line(store: &mut LineStore, line: usize) -> bool {
    if line == store.line_count() {
        store.push_line(Line::new());
    }
    line < store.line_count()
}

/// Insert `text` at the cursor.
///
/// `'\n'` in `text` splits the line (see [`split_line`]). The new cursor sits after the inserted
/// characters: it advances by the number of characters inserted, whatever their visual width. A
/// cursor on the row just past the last line materializes that line first.
pub fn insert(
    store: &mut LineStore,
    cursor: &CursorPosition,
    text: &[char],
    tab_size: usize,
) -> Option<CursorPosition> {
    if text.is_empty() {
        return None;
    }

    let mut segments = text.split(|&ch| ch == '\n');
    let first = segments.next().unwrap_or_default();
    let mut current = insert_in_line(store, cursor, first, tab_size)?;
    for segment in segments {
        current = split_line(store, &current, tab_size)?;
        current = insert_in_line(store, &current, segment, tab_size).unwrap_or(current);
    }
    Some(current)
}

fn insert_in_line(
    store: &mut LineStore,
    cursor: &CursorPosition,
    text: &[char],
    tab_size: usize,
) -> Option<CursorPosition> {
    if !ensure_line(store, cursor.line) {
        return None;
    }
    let line = store.get_line_mut(cursor.line)?;
    if text.is_empty() {
        return Some(CursorPosition::at_char_offset(
            cursor.line,
            line.chars(),
            insertion_index(line, cursor, tab_size),
            tab_size,
        ));
    }

    let at = if line.is_empty() {
        0
    } else {
        insertion_index(line, cursor, tab_size)
    };
    line.splice(at..at, text);
    trace!(line = cursor.line, at, inserted = text.len(), "inserted");

    Some(CursorPosition::at_char_offset(
        cursor.line,
        line.chars(),
        at + text.len(),
        tab_size,
    ))
}

/// Where typed text goes: after the resolved character, or at the start when nothing resolves.
fn insertion_index(line: &Line, cursor: &CursorPosition, tab_size: usize) -> usize {
    resolve_char_index(line.chars(), cursor.grid_column, tab_size)
        .map_or(0, |hit| hit.char_index + 1)
}

/// Delete `count` characters ending at the character left of the cursor.
///
/// A `count` covering the whole line clears it. Removing a tab retracts the cursor by its full
/// visual width, so the new cursor's grid column is the visual column where the removed run
/// started. Empty lines and unresolved cursors are left alone.
pub fn delete(
    store: &mut LineStore,
    cursor: &CursorPosition,
    count: usize,
    tab_size: usize,
) -> Option<CursorPosition> {
    if count == 0 {
        return None;
    }
    let line = store.get_line_mut(cursor.line)?;
    if line.is_empty() {
        return None;
    }

    if count >= line.len() {
        line.clear();
        trace!(line = cursor.line, "line cleared");
        return Some(CursorPosition::at_char_offset(cursor.line, &[], 0, tab_size));
    }

    let hit = resolve_char_index(line.chars(), cursor.grid_column, tab_size)?;
    let end = hit.char_index;
    let start = (end + 1).saturating_sub(count);
    let tabs = line.tab_count(start..end + 1);
    line.splice(start..end + 1, &[]);
    trace!(line = cursor.line, start, end, tabs, "deleted");

    Some(CursorPosition::at_char_offset(
        cursor.line,
        line.chars(),
        start,
        tab_size,
    ))
}

/// Split the line at the cursor; the text right of the cursor moves to a new line below.
///
/// Returns a cursor at the start of the new line.
pub fn split_line(
    store: &mut LineStore,
    cursor: &CursorPosition,
    tab_size: usize,
) -> Option<CursorPosition> {
    if !ensure_line(store, cursor.line) {
        return None;
    }
    let line = store.get_line_mut(cursor.line)?;
    let at = insertion_index(line, cursor, tab_size);
    let tail = line.split_off(at);
    store.insert_line(cursor.line + 1, tail).ok()?;
    trace!(line = cursor.line, at, "line split");

    Some(CursorPosition::at_char_offset(
        cursor.line + 1,
        &[],
        0,
        tab_size,
    ))
}

/// Append line `line` to the end of the line above it.
///
/// Returns a cursor at the join point on the previous line.
pub fn join_with_previous(
    store: &mut LineStore,
    line: usize,
    tab_size: usize,
) -> Option<CursorPosition> {
    if line == 0 || line >= store.line_count() {
        return None;
    }
    let moved = store.remove_line(line).ok()?;
    let previous = store.get_line_mut(line - 1)?;
    let join_at = previous.len();
    previous.append(moved);
    trace!(line, join_at, "line joined");

    Some(CursorPosition::at_char_offset(
        line - 1,
        previous.chars(),
        join_at,
        tab_size,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TAB: usize = 4;

    fn store(lines: &[&str]) -> LineStore {
        LineStore::from_lines(2, lines.iter().map(|l| Line::from_text(l))).unwrap()
    }

    fn texts(store: &LineStore) -> Vec<String> {
        store.lines().map(|l| l.to_string()).collect()
    }

    fn cursor(store: &LineStore, line: usize, grid_column: usize) -> CursorPosition {
        CursorPosition::at_grid_column(line, store.get_line(line).chars(), grid_column, TAB)
    }

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn test_insert_empty_is_noop() {
        let mut store = store(&["abc"]);
        let at = cursor(&store, 0, 1);
        assert_eq!(insert(&mut store, &at, &[], TAB), None);
        assert_eq!(texts(&store), ["abc"]);
    }

    #[test]
    fn test_insert_positions() {
        let mut store = store(&["abc"]);

        let at = cursor(&store, 0, 0);
        let after = insert(&mut store, &at, &chars("<"), TAB).unwrap();
        assert_eq!(texts(&store), ["<abc"]);
        assert_eq!(after.char_offset(), 1);

        let at = cursor(&store, 0, 4);
        let after = insert(&mut store, &at, &chars(">>"), TAB).unwrap();
        assert_eq!(texts(&store), ["<abc>>"]);
        assert_eq!(after.grid_column, 6);

        let at = cursor(&store, 0, 2);
        insert(&mut store, &at, &chars("-"), TAB).unwrap();
        assert_eq!(texts(&store), ["<a-bc>>"]);
    }

    #[test]
    fn test_insert_into_empty_line_appends() {
        let mut store = store(&["", "x"]);
        let at = cursor(&store, 0, 7);
        let after = insert(&mut store, &at, &chars("hi"), TAB).unwrap();
        assert_eq!(texts(&store), ["hi", "x"]);
        assert_eq!(after.char_offset(), 2);
    }

    #[test]
    fn test_insert_tab_advances_one_character() {
        let mut store = store(&["ab"]);
        let at = cursor(&store, 0, 1);
        let after = insert(&mut store, &at, &['\t'], TAB).unwrap();
        assert_eq!(texts(&store), ["a\tb"]);
        assert_eq!(after.char_offset(), at.char_offset() + 1);
        assert_eq!(after.grid_column, 1 + TAB);
    }

    #[test]
    fn test_insert_inside_tab_goes_after_it() {
        let mut store = store(&["\tHi"]);
        let at = cursor(&store, 0, 2);
        assert_eq!(at.chars_to_offset_by, 2);
        let after = insert(&mut store, &at, &chars("x"), TAB).unwrap();
        assert_eq!(texts(&store), ["\txHi"]);
        assert_eq!(after.grid_column, 5);
    }

    #[test]
    fn test_insert_on_row_past_end_materializes_line() {
        let mut store = store(&["a"]);
        let at = cursor(&store, 1, 0);
        insert(&mut store, &at, &chars("b"), TAB).unwrap();
        assert_eq!(texts(&store), ["a", "b"]);

        let at = cursor(&store, 5, 0);
        assert_eq!(insert(&mut store, &at, &chars("c"), TAB), None);
    }

    #[test]
    fn test_insert_with_newlines_splits() {
        let mut store = store(&["headtail", "z"]);
        let at = cursor(&store, 0, 4);
        let after = insert(&mut store, &at, &chars("1\n2\n3"), TAB).unwrap();
        assert_eq!(texts(&store), ["head1", "2", "3tail", "z"]);
        assert_eq!(after.line, 2);
        assert_eq!(after.char_offset(), 1);
    }

    #[test]
    fn test_delete_noops() {
        let mut store = store(&["", "abc"]);
        let at = cursor(&store, 0, 0);
        assert_eq!(delete(&mut store, &at, 1, TAB), None);

        let at = cursor(&store, 1, 0);
        assert_eq!(delete(&mut store, &at, 1, TAB), None);
        let at = cursor(&store, 1, 2);
        assert_eq!(delete(&mut store, &at, 0, TAB), None);
        assert_eq!(texts(&store), ["", "abc"]);
    }

    #[test]
    fn test_delete_whole_line_clears() {
        let mut store = store(&["abc"]);
        let at = cursor(&store, 0, 1);
        let after = delete(&mut store, &at, 3, TAB).unwrap();
        assert_eq!(texts(&store), [""]);
        assert_eq!(after.grid_column, 0);
    }

    #[test]
    fn test_delete_run_ending_at_cursor() {
        let mut store = store(&["abcdef"]);
        let at = cursor(&store, 0, 4);
        let after = delete(&mut store, &at, 2, TAB).unwrap();
        assert_eq!(texts(&store), ["abef"]);
        assert_eq!(after.grid_column, 2);

        let at = cursor(&store, 0, 1);
        let after = delete(&mut store, &at, 3, TAB).unwrap();
        assert_eq!(texts(&store), ["bef"]);
        assert_eq!(after.grid_column, 0);
    }

    #[test]
    fn test_delete_after_tab_retracts_tab_width() {
        let mut store = store(&["\tHi"]);
        let at = cursor(&store, 0, TAB);
        let after = delete(&mut store, &at, 1, TAB).unwrap();
        assert_eq!(texts(&store), ["Hi"]);
        assert_eq!(at.grid_column - after.grid_column, TAB);
    }

    #[test]
    fn test_delete_plain_char_retracts_one_cell() {
        let mut store = store(&["\tHi"]);
        let at = cursor(&store, 0, 6);
        let after = delete(&mut store, &at, 1, TAB).unwrap();
        assert_eq!(texts(&store), ["\tH"]);
        assert_eq!(after.grid_column, 5);
    }

    #[test]
    fn test_delete_mixed_run_retracts_run_width() {
        let mut store = store(&["xa\tb", "abcd"]);
        let at = cursor(&store, 0, 1 + 1 + TAB + 1);
        let after = delete(&mut store, &at, 3, TAB).unwrap();
        assert_eq!(texts(&store), ["x", "abcd"]);
        assert_eq!(after.grid_column, 1);
        assert_eq!(at.grid_column - after.grid_column, 2 + TAB);

        let at = cursor(&store, 1, 4);
        let after = delete(&mut store, &at, 3, TAB).unwrap();
        assert_eq!(texts(&store), ["x", "a"]);
        assert_eq!(at.grid_column - after.grid_column, 3);
    }

    #[test]
    fn test_insert_then_delete_restores_line() {
        let mut store = store(&["hello world"]);
        let at = cursor(&store, 0, 5);
        let inserted = chars(", big");
        let after = insert(&mut store, &at, &inserted, TAB).unwrap();
        assert_eq!(texts(&store), ["hello, big world"]);

        let back = delete(&mut store, &after, inserted.len(), TAB).unwrap();
        assert_eq!(texts(&store), ["hello world"]);
        assert_eq!(back, at);
    }

    #[test]
    fn test_split_and_join_across_buckets() {
        let mut store = store(&["ab", "cd", "ef"]);
        let at = cursor(&store, 1, 1);
        let after = split_line(&mut store, &at, TAB).unwrap();
        assert_eq!(texts(&store), ["ab", "c", "d", "ef"]);
        assert_eq!(store.bucket_count(), 2);
        assert_eq!(after.line, 2);
        assert_eq!(after.grid_column, 0);

        let joined = join_with_previous(&mut store, 2, TAB).unwrap();
        assert_eq!(texts(&store), ["ab", "cd", "ef"]);
        assert_eq!(joined, at);

        assert_eq!(join_with_previous(&mut store, 0, TAB), None);
        assert_eq!(join_with_previous(&mut store, 3, TAB), None);
    }
}
