use crate::device_display::interface::DeviceDisplay;
use image::DynamicImage;
use std::error::Error;

pub struct DeviceDisplayConsole {
    image_line: String,
    text: String,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {
            image_line: "(no photo)".to_string(),
            text: String::new(),
        }
    }

    fn render_display(&self) {
        print!("{}", frame(&[&self.image_line, &self.text]));
    }
}

fn frame(rows: &[&str]) -> String {
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    let border = "─".repeat(width);

    let mut out = format!("┌{}┐\n", border);
    for row in rows {
        let padding = width - row.chars().count();
        out.push_str(&format!("│{}{}│\n", row, " ".repeat(padding)));
    }
    out.push_str(&format!("└{}┘\n", border));
    out
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.render_display();
        Ok(())
    }

    fn show_image(&mut self, image: &DynamicImage) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.image_line = format!("[photo {}x{}]", image.width(), image.height());
        self.render_display();
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.text = text.to_string();
        self.render_display();
        Ok(())
    }
}
