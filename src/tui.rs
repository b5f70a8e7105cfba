use crossterm::{
    cursor::MoveToPreviousLine,
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io;

/// Single-line terminal progress display for a paginated scrape run.
pub struct ScraperTUI {
    progress_line_printed: bool,
}

impl ScraperTUI {
    pub fn new() -> Self {
        Self {
            progress_line_printed: false,
        }
    }

    /// Show initial status with the advertised listing total.
    pub fn start_run(&mut self, total: usize) -> io::Result<()> {
        execute!(
            io::stdout(),
            SetForegroundColor(Color::White),
            Print(format!("⏳ Scraping listings (0/{})...\n", total)),
            ResetColor
        )?;
        self.progress_line_printed = true;
        Ok(())
    }

    /// Rewrite the progress line after a page completes.
    pub fn page_done(&mut self, page: usize, scraped: usize, total: usize) -> io::Result<()> {
        self.clear_progress_line()?;
        execute!(
            io::stdout(),
            SetForegroundColor(Color::White),
            Print(format!(
                "⏳ Scraping listings ({}/{}) - page {} done...\n",
                scraped, total, page
            )),
            ResetColor
        )?;
        self.progress_line_printed = true;
        Ok(())
    }

    /// Replace the progress line with a green completion line.
    pub fn finish_run(&mut self, scraped: usize) -> io::Result<()> {
        self.clear_progress_line()?;
        execute!(
            io::stdout(),
            SetForegroundColor(Color::Green),
            Print(format!("✅ Scraped {} listings\n", scraped)),
            ResetColor
        )?;
        self.progress_line_printed = false;
        Ok(())
    }

    fn clear_progress_line(&mut self) -> io::Result<()> {
        if self.progress_line_printed {
            execute!(
                io::stdout(),
                MoveToPreviousLine(1),
                Clear(ClearType::CurrentLine)
            )?;
        }
        Ok(())
    }
}

impl Default for ScraperTUI {
    fn default() -> Self {
        Self::new()
    }
}
