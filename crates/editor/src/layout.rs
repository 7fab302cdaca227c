use std::{fmt, ops::RangeInclusive, str::FromStr};

use crate::boundary::Fullscreen;

/// Allowed widths of the file tree, in pixels
pub const LEFT_PANEL_RANGE: RangeInclusive<u32> = 200..=400;
/// Allowed widths of the output/debug/settings panel, in pixels
pub const RIGHT_PANEL_RANGE: RangeInclusive<u32> = 300..=500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RightTab {
    #[default]
    Output,
    Debug,
    Settings,
}

impl fmt::Display for RightTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RightTab::Output => "output",
            RightTab::Debug => "debug",
            RightTab::Settings => "settings",
        })
    }
}

impl FromStr for RightTab {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "output" => Ok(Self::Output),
            "debug" => Ok(Self::Debug),
            "settings" => Ok(Self::Settings),
            other => Err(eyre::eyre!("invalid tab {other}")),
        }
    }
}

/// Presentational state of the three panes; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    left_panel_width: u32,
    right_panel_width: u32,
    active_right_tab: RightTab,
    is_fullscreen: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            left_panel_width: 250,
            right_panel_width: 350,
            active_right_tab: RightTab::Output,
            is_fullscreen: false,
        }
    }
}

fn clamp(width: i64, range: &RangeInclusive<u32>) -> u32 {
    width.clamp(i64::from(*range.start()), i64::from(*range.end())) as u32
}

impl Layout {
    pub fn left_panel_width(&self) -> u32 {
        self.left_panel_width
    }

    pub fn right_panel_width(&self) -> u32 {
        self.right_panel_width
    }

    pub fn active_right_tab(&self) -> RightTab {
        self.active_right_tab
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Set the file tree width, clamped to [`LEFT_PANEL_RANGE`]
    pub fn resize_left(&mut self, width: u32) -> u32 {
        self.left_panel_width = clamp(i64::from(width), &LEFT_PANEL_RANGE);
        self.left_panel_width
    }

    /// Set the right panel width, clamped to [`RIGHT_PANEL_RANGE`]
    pub fn resize_right(&mut self, width: u32) -> u32 {
        self.right_panel_width = clamp(i64::from(width), &RIGHT_PANEL_RANGE);
        self.right_panel_width
    }

    /// Drag the file tree splitter by `delta` pixels
    pub fn drag_left(&mut self, delta: i32) -> u32 {
        let width = i64::from(self.left_panel_width) + i64::from(delta);
        self.left_panel_width = clamp(width, &LEFT_PANEL_RANGE);
        self.left_panel_width
    }

    /// Drag the right splitter by `delta` pixels; dragging left widens the panel
    pub fn drag_right(&mut self, delta: i32) -> u32 {
        let width = i64::from(self.right_panel_width) - i64::from(delta);
        self.right_panel_width = clamp(width, &RIGHT_PANEL_RANGE);
        self.right_panel_width
    }

    pub fn select_tab(&mut self, tab: RightTab) {
        self.active_right_tab = tab;
    }

    /// Ask the host to enter or leave fullscreen and flip the flag.
    ///
    /// The request is not awaited, so a denied request leaves the flag out of step with the
    /// real window state.
    pub fn toggle_fullscreen(&mut self, fullscreen: &mut dyn Fullscreen) {
        if self.is_fullscreen {
            fullscreen.exit();
        } else {
            fullscreen.request();
        }
        self.is_fullscreen = !self.is_fullscreen;
        tracing::debug!(is_fullscreen = self.is_fullscreen, "toggled fullscreen");
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Layout, RightTab};
    use crate::Fullscreen;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl Fullscreen for Recorder {
        fn request(&mut self) {
            self.calls.push("request");
        }

        fn exit(&mut self) {
            self.calls.push("exit");
        }
    }

    #[rstest]
    #[case(100, 200)]
    #[case(200, 200)]
    #[case(321, 321)]
    #[case(400, 400)]
    #[case(9000, 400)]
    fn left_width_is_bounded(#[case] requested: u32, #[case] expected: u32) {
        let mut layout = Layout::default();
        assert_eq!(layout.resize_left(requested), expected);
    }

    #[rstest]
    #[case(0, 300)]
    #[case(450, 450)]
    #[case(501, 500)]
    fn right_width_is_bounded(#[case] requested: u32, #[case] expected: u32) {
        let mut layout = Layout::default();
        assert_eq!(layout.resize_right(requested), expected);
    }

    #[test]
    fn dragging_clamps() {
        let mut layout = Layout::default();
        assert_eq!(layout.drag_left(-1000), 200);
        assert_eq!(layout.drag_left(120), 320);
        assert_eq!(layout.drag_right(-100), 450);
        assert_eq!(layout.drag_right(-100), 500);
        assert_eq!(layout.drag_right(i32::MAX), 300);
    }

    #[test]
    fn defaults() {
        let layout = Layout::default();
        assert_eq!(layout.left_panel_width(), 250);
        assert_eq!(layout.right_panel_width(), 350);
        assert_eq!(layout.active_right_tab(), RightTab::Output);
        assert!(!layout.is_fullscreen());
    }

    #[test]
    fn fullscreen_alternates_requests() {
        let mut layout = Layout::default();
        let mut host = Recorder::default();
        layout.toggle_fullscreen(&mut host);
        assert!(layout.is_fullscreen());
        layout.toggle_fullscreen(&mut host);
        assert!(!layout.is_fullscreen());
        assert_eq!(host.calls, vec!["request", "exit"]);
    }

    #[test]
    fn tab_names() {
        assert_eq!("debug".parse::<RightTab>().unwrap(), RightTab::Debug);
        assert_eq!(RightTab::Settings.to_string(), "settings");
        assert!("console".parse::<RightTab>().is_err());
    }
}
