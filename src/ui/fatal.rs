use eframe::egui;

/// Shown instead of the shell when startup fails, so the window is never blank.
pub struct FatalApp {
    message: String,
}

impl FatalApp {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

impl eframe::App for FatalApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(egui::RichText::new("FATAL").color(egui::Color32::from_rgb(220, 80, 80)));
            ui.separator();
            ui.add(egui::Label::new(self.message.as_str()).wrap());
            ui.add_space(8.0);
            ui.weak("Fix the problem above and restart. Set RUST_LOG=debug for details.");
        });
    }
}
