pub mod layout;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use numtap::celebration::Celebration;

use crate::App;

const SPARK_COLORS: [Color; 7] = [
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::LightYellow,
];

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(self.game.screen()).render(self, area, buf);

        if self.celebration.is_active {
            render_celebration(&self.celebration, area, buf);
        }
    }
}

/// Draw sparks on top of whatever screen is showing
fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    for spark in &celebration.sparks {
        if spark.x < 0.0 || spark.y < 0.0 {
            continue;
        }
        let (x, y) = (spark.x as u16, spark.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = SPARK_COLORS[spark.color_index % SPARK_COLORS.len()];
        let brightness = spark.brightness();
        let style = if brightness > 0.7 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if brightness > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&spark.symbol.to_string());
            cell.set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::App;
    use numtap::{
        clock::ManualClock,
        config::Config,
        device::DeviceClass,
        mode::{base_mode, multiples_mode},
        scores::MemoryKeyValueStore,
        Difficulty, GameController,
    };

    fn create_test_app() -> (App, ManualClock) {
        let clock = ManualClock::new();
        let game = GameController::new(Box::new(MemoryKeyValueStore::new()), &Config::default())
            .with_clock(clock.clone());
        (App::new(game, DeviceClass::Pointer), clock)
    }

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_menu_lists_modes() {
        let (app, _) = create_test_app();
        let text = rendered(&app, Rect::new(0, 0, 100, 24));
        assert!(text.contains("Basic (1-9)"));
        assert!(text.contains("Multiples of 9"));
        assert!(text.contains("(q)uit"));
    }

    #[test]
    fn test_menu_shows_bests() {
        let (mut app, clock) = create_test_app();
        app.game.select_mode(base_mode());
        for v in 1..=9 {
            clock.advance_ms(500);
            app.game.tap(v);
        }
        app.game.menu();

        let text = rendered(&app, Rect::new(0, 0, 100, 24));
        assert!(text.contains("best 4.00s"));
    }

    #[test]
    fn test_difficulty_screen() {
        let (mut app, _) = create_test_app();
        app.game.select_mode(multiples_mode(6).unwrap());
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("Multiples of 6"));
        assert!(text.contains("3x3"));
        assert!(text.contains("4x4"));
    }

    #[test]
    fn test_playing_screen_shows_every_target() {
        let (mut app, _) = create_test_app();
        app.game.select_mode(multiples_mode(8).unwrap());
        app.game.choose_difficulty(Difficulty::Large);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        for v in [8, 64, 128] {
            assert!(text.contains(&v.to_string()), "missing {v}");
        }
        assert!(text.contains("1 / 16"));
        assert!(text.contains("next: 8"));
        assert!(text.contains("0.00s"));
    }

    #[test]
    fn test_playing_screen_flags_misses() {
        let (mut app, _) = create_test_app();
        app.game.select_mode(base_mode());
        app.game.tap(9);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("wrong number"));
    }

    #[test]
    fn test_finished_screen() {
        let (mut app, clock) = create_test_app();
        app.game.select_mode(base_mode());
        for v in 1..=9 {
            clock.advance_ms(100);
            app.game.tap(v);
        }
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("Basic (1-9) cleared!"));
        assert!(text.contains("0.80s"));
        assert!(text.contains("NEW RECORD!"));
        assert!(text.contains("(r)etry"));
    }

    #[test]
    fn test_touch_hint_hides_keyboard_controls() {
        let (mut app, _) = create_test_app();
        app.device = DeviceClass::TouchPrimary;
        app.game.select_mode(base_mode());
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("click the numbers in order"));
        assert!(!text.contains("(enter) next"));
    }

    #[test]
    fn test_extreme_sizes() {
        let (mut app, _) = create_test_app();
        for area in [
            Rect::new(0, 0, 10, 5),
            Rect::new(0, 0, 200, 5),
            Rect::new(0, 0, 20, 50),
        ] {
            rendered(&app, area);
        }
        app.game.select_mode(base_mode());
        for area in [Rect::new(0, 0, 10, 5), Rect::new(0, 0, 300, 100)] {
            let mut buffer = Buffer::empty(area);
            app.render(area, &mut buffer);
            assert!(*buffer.area() == area);
        }
    }

    #[test]
    fn test_celebration_overlay_renders() {
        let (mut app, _) = create_test_app();
        app.celebration.start(80, 24);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert!(app.celebration.is_active);
        assert!(*buffer.area() == area);
    }
}
