use eframe::egui;

use crate::engine::compose::TabLayout;
use crate::model::tab::Tab;
use crate::ui::assets::AssetStatus;

pub struct TabBarResponse {
    pub clicked: Option<Tab>,
    pub height: f32,
}

/// Two rows of tabs: the fixed four on top, maps/NPC and life jobs below.
pub fn draw_tab_bar(
    ctx: &egui::Context,
    layout: &TabLayout,
    active: Tab,
    status: AssetStatus,
) -> TabBarResponse {
    let shown = egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
        let mut clicked = None;

        ui.horizontal(|ui| {
            for button in &layout.top {
                if ui.selectable_label(button.tab == active, button.label.as_str()).clicked() {
                    clicked = Some(button.tab);
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(status.label());
            });
        });

        ui.horizontal(|ui| {
            for button in &layout.bottom {
                if ui.selectable_label(button.tab == active, button.label.as_str()).clicked() {
                    clicked = Some(button.tab);
                }
            }
        });

        clicked
    });

    TabBarResponse {
        clicked: shown.inner,
        height: shown.response.rect.height(),
    }
}
