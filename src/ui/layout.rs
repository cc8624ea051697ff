use ratatui::layout::{Constraint, Direction, Layout, Rect};

use numtap::placement::{GridPoint, Target};

pub const HORIZONTAL_MARGIN: u16 = 2;
/// Rows above the board: title, progress/next, timer, feedback
pub const HEADER_HEIGHT: u16 = 4;
pub const FOOTER_HEIGHT: u16 = 2;
/// Width of a target label such as ` 48 `
pub const TARGET_WIDTH: u16 = 6;

/// Split the playing screen into header, board and footer
pub fn playing_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// The region grid points are expressed against
pub fn play_area(area: Rect) -> Rect {
    playing_chunks(area)[1]
}

/// Screen cell box of a target centred on `point`, clipped to `board`
pub fn target_rect(board: Rect, point: GridPoint) -> Rect {
    let cx = board.x as f64 + board.width as f64 * point.x / 100.0;
    let cy = board.y as f64 + board.height as f64 * point.y / 100.0;

    let x = (cx - TARGET_WIDTH as f64 / 2.0).round().max(board.x as f64) as u16;
    let y = cy.floor().max(board.y as f64) as u16;

    Rect::new(x, y, TARGET_WIDTH, 1).intersection(board)
}

/// Value of the target drawn under the cell (`column`, `row`), if any
pub fn target_at(board: Rect, targets: &[Target], column: u16, row: u16) -> Option<u32> {
    targets
        .iter()
        .find(|t| {
            let r = target_rect(board, t.position);
            column >= r.x && column < r.right() && row >= r.y && row < r.bottom()
        })
        .map(|t| t.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use numtap::placement::{GRID_3X3, GRID_4X4};

    fn targets(grid: &[GridPoint]) -> Vec<Target> {
        grid.iter()
            .enumerate()
            .map(|(i, &position)| Target {
                value: i as u32 + 1,
                position,
                completed: false,
            })
            .collect()
    }

    #[test]
    fn test_play_area_leaves_room_for_header_and_footer() {
        let area = Rect::new(0, 0, 80, 24);
        let board = play_area(area);
        assert_eq!(board.y, HEADER_HEIGHT);
        assert_eq!(board.height, 24 - HEADER_HEIGHT - FOOTER_HEIGHT);
        assert_eq!(board.x, HORIZONTAL_MARGIN);
    }

    #[test]
    fn test_targets_do_not_overlap_on_standard_terminal() {
        let board = play_area(Rect::new(0, 0, 80, 24));
        for grid in [&GRID_3X3[..], &GRID_4X4[..]] {
            let rects: Vec<Rect> = grid.iter().map(|p| target_rect(board, *p)).collect();
            for (i, a) in rects.iter().enumerate() {
                assert!(!a.is_empty());
                for b in rects.iter().skip(i + 1) {
                    assert!(!a.intersects(*b), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_hit_testing_finds_each_target() {
        let board = play_area(Rect::new(0, 0, 100, 30));
        let placed = targets(&GRID_4X4);
        for t in &placed {
            let r = target_rect(board, t.position);
            assert_eq!(target_at(board, &placed, r.x, r.y), Some(t.value));
            assert_eq!(target_at(board, &placed, r.right() - 1, r.y), Some(t.value));
        }
    }

    #[test]
    fn test_click_on_empty_cell_misses() {
        let board = play_area(Rect::new(0, 0, 80, 24));
        let placed = targets(&GRID_3X3);
        assert_eq!(target_at(board, &placed, 0, 0), None);
        assert_eq!(target_at(board, &placed, board.x, board.y), None);
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let board = play_area(Rect::new(0, 0, 4, 3));
        for p in GRID_4X4 {
            let _ = target_rect(board, p);
        }
    }
}
