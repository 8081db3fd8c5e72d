//! Screen layouts
//!
//! One layout per mode, laid out for a 20x4 character display:
//!
//! ```text
//! Halt              Run                    Programming
//! +--------------------+ +--------------------+ +--------------------+
//! |                    | |  ##     RUN    ##  | |  ** Prog Mode **   |
//! |####################| |   LOCOMOTIVE: 3    | |CV: 29  Value: 6    |
//! |##     S T O P    ##| |  SPEED:  64% ==>   | |           00000110 |
//! |####################| |0100000000          | | Config register    |
//! +--------------------+ +--------------------+ +--------------------+
//! ```

use keycab_protocol::Direction;

use super::screen::Screen;
use crate::config::ControllerConfig;
use crate::functions::FUNCTION_COUNT;
use crate::session::{Mode, Notice, Session};

const STOP_FRAME: &str = "####################";
const STOP_BANNER: &str = "##     S T O P    ##";

const LOCO_PROMPT: &str = "  Press loco + Ent";
const LOCO_LABEL_COL: u8 = 13;

const RUN_BANNER: &str = "  ##     RUN    ##";

const PROG_BANNER: &str = "  ** Prog Mode **";
/// Column of the first CV index digit
const PROG_CV_COL: u8 = 4;
/// Column of the first CV value digit
const PROG_VALUE_COL: u8 = 15;
/// Column of the binary value
const PROG_BITS_COL: usize = 11;

const READ_ERROR: &str = "Read CV ERROR";
const WRITE_ERROR: &str = "Write CV ERROR";

/// Builds screens from session state
pub struct Renderer {
    screen: Screen,
}

impl Renderer {
    /// Create a new renderer
    pub const fn new() -> Self {
        Self {
            screen: Screen::new(),
        }
    }

    /// Get the current screen buffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Render the boot screen
    pub fn render_splash(&mut self, config: &ControllerConfig) -> &Screen {
        self.screen.clear();
        for (row, line) in config.splash.iter().enumerate() {
            self.screen.set_line(row as u8, line);
        }
        &self.screen
    }

    /// Render the layout for the session's mode
    ///
    /// The result depends only on `session` and `config`.
    pub fn render(&mut self, session: &Session, config: &ControllerConfig) -> &Screen {
        self.screen.clear();
        match session.mode() {
            Mode::Halt => self.render_halt(),
            Mode::LocoSelect => self.render_loco_select(session),
            Mode::Run => self.render_run(session),
            Mode::ProgRead | Mode::ProgWrite => self.render_programming(session, config),
        }
        &self.screen
    }

    fn render_halt(&mut self) {
        self.screen.set_line(1, STOP_FRAME);
        self.screen.set_line(2, STOP_BANNER);
        self.screen.set_line(3, STOP_FRAME);
    }

    fn render_loco_select(&mut self, session: &Session) {
        self.screen.set_line(0, LOCO_PROMPT);
        self.screen
            .write_line(2, format_args!(" Locomotive: {}", session.address()));
        self.screen
            .set_cursor(2, LOCO_LABEL_COL + session.entry_len());
    }

    fn render_run(&mut self, session: &Session) {
        let arrow = match session.direction() {
            Direction::Forward => "==>",
            Direction::Reverse => "<==",
        };

        self.screen.set_line(0, RUN_BANNER);
        self.screen
            .write_line(1, format_args!("   LOCOMOTIVE: {}", session.address()));
        self.screen
            .write_line(2, format_args!("  SPEED:  {}% {} ", session.speed(), arrow));

        let mut flags = [b'0'; FUNCTION_COUNT];
        for (cell, on) in flags.iter_mut().zip(session.functions().flags()) {
            if *on {
                *cell = b'1';
            }
        }
        // Only '0' and '1' were written
        self.screen
            .set_line(3, core::str::from_utf8(&flags).unwrap_or(""));
    }

    fn render_programming(&mut self, session: &Session, config: &ControllerConfig) {
        self.screen.set_line(0, PROG_BANNER);
        self.screen.write_line(
            1,
            format_args!("CV: {:<4}Value: {}", session.cv(), session.cv_value()),
        );
        self.screen.write_line(
            2,
            format_args!(
                "{:width$}{:08b}",
                "",
                session.cv_value(),
                width = PROG_BITS_COL
            ),
        );

        match session.notice() {
            Some(Notice::ReadFailed) => self.screen.set_line(3, READ_ERROR),
            Some(Notice::WriteFailed) => self.screen.set_line(3, WRITE_ERROR),
            None => {
                if let Some(label) = config.cv_labels.get(session.cv()) {
                    self.screen.write_line(3, format_args!(" {}", label));
                }
            }
        }

        let col = match session.mode() {
            Mode::ProgWrite => PROG_VALUE_COL,
            _ => PROG_CV_COL,
        };
        self.screen.set_cursor(1, col + session.entry_len());
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
