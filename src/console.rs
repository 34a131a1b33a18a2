//! Text-mode console rendering.
//!
//! One live 4 KB page of 80x25 two-byte cells, plus rendering helpers that
//! work against any video page so sessions can draw into their retained
//! pages while off screen.

pub const COLS: usize = 80;
pub const ROWS: usize = 25;
/// Size of a video page (the rendered cells plus slack up to 4 KB).
pub const VIDEO_PAGE: usize = 4096;

const ATTRIBUTE: u8 = 0x07;

pub type VideoPage = [u8; VIDEO_PAGE];

/// Per-session output position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

impl Cursor {
    pub fn origin() -> Cursor {
        Cursor { x: 0, y: 0 }
    }
}

/// The live display page. Retained per-session pages are copied in and
/// out of it when the displayed session changes.
pub struct Console {
    live: VideoPage,
}

impl Console {
    pub fn new() -> Console {
        let mut console = Console {
            live: [0; VIDEO_PAGE],
        };
        clear_page(&mut console.live);
        console
    }

    pub fn live(&self) -> &VideoPage {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut VideoPage {
        &mut self.live
    }

    /// Save the live page into a session's retained page.
    pub fn save_into(&self, shadow: &mut VideoPage) {
        shadow.copy_from_slice(&self.live);
    }

    /// Bring a session's retained page onto the display.
    pub fn load_from(&mut self, shadow: &VideoPage) {
        self.live.copy_from_slice(shadow);
    }
}

pub fn clear_page(page: &mut VideoPage) {
    for cell in 0..COLS * ROWS {
        page[cell * 2] = b' ';
        page[cell * 2 + 1] = ATTRIBUTE;
    }
}

/// Render one byte at the cursor, handling newline, backspace and
/// scrolling. Control bytes move the cursor; everything else is a glyph.
pub fn write_char(page: &mut VideoPage, cursor: &mut Cursor, byte: u8) {
    match byte {
        b'\n' => {
            cursor.x = 0;
            cursor.y += 1;
        }
        0x08 => {
            if cursor.x > 0 {
                cursor.x -= 1;
            } else if cursor.y > 0 {
                cursor.y -= 1;
                cursor.x = COLS - 1;
            }
            put_cell(page, cursor.x, cursor.y, b' ');
        }
        _ => {
            put_cell(page, cursor.x, cursor.y, byte);
            cursor.x += 1;
            if cursor.x == COLS {
                cursor.x = 0;
                cursor.y += 1;
            }
        }
    }

    if cursor.y == ROWS {
        scroll(page);
        cursor.y = ROWS - 1;
    }
}

fn put_cell(page: &mut VideoPage, x: usize, y: usize, byte: u8) {
    let cell = y * COLS + x;
    page[cell * 2] = byte;
    page[cell * 2 + 1] = ATTRIBUTE;
}

/// Byte shown at a cell; used by render checks.
pub fn cell_at(page: &VideoPage, x: usize, y: usize) -> u8 {
    page[(y * COLS + x) * 2]
}

fn scroll(page: &mut VideoPage) {
    page.copy_within(COLS * 2..COLS * ROWS * 2, 0);
    for x in 0..COLS {
        put_cell(page, x, ROWS - 1, b' ');
    }
}
