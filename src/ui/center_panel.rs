use eframe::egui;

use crate::config::ShellConfig;
use crate::engine::compose::{BlockStyle, PanelBlock, PanelView};
use crate::model::tactical::PersonaMode;

const LOG_HEIGHT: f32 = 120.0;

pub struct BarResponse<T> {
    pub action: Option<T>,
    pub height: f32,
}

pub enum InputAction {
    Send,
    Persona(PersonaMode),
}

pub enum LifeJobAction {
    Cancel,
    Execute,
}

/* =========================
   Bottom bars
   ========================= */

/// Enter inserts a line break; only the Send button submits.
pub fn draw_input_bar(
    ctx: &egui::Context,
    draft: &mut String,
    persona: PersonaMode,
) -> BarResponse<InputAction> {
    let input_id = egui::Id::new("world_input_box");

    let shown = egui::TopBottomPanel::bottom("input_bar").show(ctx, |ui| {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.label("Advisor");
            let mut mode = persona;
            egui::ComboBox::from_id_salt("persona")
                .selected_text(mode.label())
                .show_ui(ui, |ui| {
                    for m in PersonaMode::ALL {
                        ui.selectable_value(&mut mode, m, m.label());
                    }
                });
            if mode != persona {
                action = Some(InputAction::Persona(mode));
            }
        });

        ui.horizontal(|ui| {
            ui.add_sized(
                [ui.available_width() - 60.0, 60.0],
                egui::TextEdit::multiline(draft)
                    .id(input_id)
                    .hint_text("What will you do?"),
            );

            if ui.button("Send").clicked() {
                action = Some(InputAction::Send);
                // Keep the cursor in the box after sending
                ui.memory_mut(|m| m.request_focus(input_id));
            }
        });

        action
    });

    BarResponse {
        action: shown.inner,
        height: shown.response.rect.height(),
    }
}

pub fn draw_action_bar(ctx: &egui::Context) -> BarResponse<LifeJobAction> {
    let shown = egui::TopBottomPanel::bottom("action_bar").show(ctx, |ui| {
        let mut action = None;
        ui.horizontal(|ui| {
            if ui.button("Cancel").clicked() {
                action = Some(LifeJobAction::Cancel);
            }
            if ui.button("Execute").clicked() {
                action = Some(LifeJobAction::Execute);
            }
        });
        action
    });

    BarResponse {
        action: shown.inner,
        height: shown.response.rect.height(),
    }
}

/* =========================
   Scroll container
   ========================= */

/// Paints the composed panel. Returns a recipe index if one was picked.
pub fn draw_content(
    ctx: &egui::Context,
    view: &PanelView,
    config: &ShellConfig,
    viewport_height: f32,
) -> Option<usize> {
    egui::CentralPanel::default()
        .show(ctx, |ui| {
            let mut picked = None;

            let content_height = match view.log {
                Some(_) => (viewport_height - LOG_HEIGHT).max(0.0),
                None => viewport_height,
            };

            egui::ScrollArea::vertical()
                .id_salt("scroll")
                .max_height(content_height)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for block in &view.blocks {
                        if let Some(i) = draw_block(ui, block, config) {
                            picked = Some(i);
                        }
                    }
                });

            if let Some(log) = &view.log {
                ui.separator();
                ui.label(
                    egui::RichText::new(&log.title)
                        .small()
                        .color(config.color("title")),
                );
                egui::ScrollArea::vertical()
                    .id_salt("log")
                    .max_height(LOG_HEIGHT)
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for line in &log.lines {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(line).color(config.color("muted")),
                                )
                                .wrap(),
                            );
                        }
                    });
            }

            picked
        })
        .inner
}

fn draw_block(ui: &mut egui::Ui, block: &PanelBlock, config: &ShellConfig) -> Option<usize> {
    let mut picked = None;

    egui::Frame::new()
        .fill(config.color("panel"))
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new(&block.title)
                    .small()
                    .strong()
                    .color(config.color("title")),
            );

            match block.style {
                BlockStyle::Plain | BlockStyle::Muted => {
                    let color = if block.style == BlockStyle::Muted {
                        config.color("muted")
                    } else {
                        config.color("text")
                    };
                    for line in &block.lines {
                        ui.add(egui::Label::new(egui::RichText::new(line).color(color)).wrap());
                    }
                }
                BlockStyle::Choice { selected } => {
                    for (i, line) in block.lines.iter().enumerate() {
                        let is_selected = selected == Some(i);
                        let color = if is_selected {
                            config.color("selected")
                        } else {
                            config.color("text")
                        };
                        let text = egui::RichText::new(line).color(color);
                        if ui.selectable_label(is_selected, text).clicked() {
                            picked = Some(i);
                        }
                    }
                }
            }
        });

    ui.add_space(6.0);
    picked
}
