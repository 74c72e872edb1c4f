use super::config::MAX_QUALITY;
use super::lighting::EnvironmentLight;

const ABOUT_TEXT: &str = "Mesh Viewer\n\n\
    A simple 3D model viewer built with wgpu and egui.\n\n\
    Environment lighting with specular highlights is computed in the mesh shader.";

/// Request from the UI, applied by the application
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    ToggleAxes,
    SetBackground([f32; 4]),
    SetModelColor([f32; 4]),
    SetAutopan(bool),
    SetAutopanSpeed(f32),
    IncreaseQuality,
    DecreaseQuality,
    SetOutline(bool),
    /// Ask for a PNG path in a native save dialog, then capture
    SaveScreenshot,
    /// Ask for a mesh file in a native open dialog, then reload
    OpenMesh,
    SetLighting(EnvironmentLight),
    Exit,
}

/// Application state the UI displays
#[derive(Debug, Clone)]
pub struct UiStatus {
    pub file_name: String,
    pub background: [f32; 4],
    pub model_color: [f32; 4],
    pub autopan_enabled: bool,
    pub autopan_speed: f32,
    pub outline_visible: bool,
    pub quality: u32,
    pub sample_count: u32,
    pub light: EnvironmentLight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialog {
    Background,
    ModelColor,
    AutopanSpeed,
    Lighting,
    About,
}

/// Menus, toolbar, dialogs and message windows
#[derive(Debug, Default)]
pub struct ViewerUi {
    dialog: Option<Dialog>,
    error: Option<String>,
    info: Option<String>,
    color_input: [f32; 3],
    speed_input: f32,
    light_input: EnvironmentLight,
}

impl ViewerUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a modal error window
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn show_info(&mut self, message: impl Into<String>) {
        self.info = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn open(&mut self, dialog: Dialog, status: &UiStatus) {
        let rgb = |c: [f32; 4]| [c[0], c[1], c[2]];
        match dialog {
            Dialog::Background => self.color_input = rgb(status.background),
            Dialog::ModelColor => self.color_input = rgb(status.model_color),
            Dialog::AutopanSpeed => self.speed_input = status.autopan_speed,
            Dialog::Lighting => self.light_input = status.light,
            Dialog::About => {}
        }
        self.dialog = Some(dialog);
    }

    /// Draw the whole UI for one frame and collect the requested actions
    pub fn show(&mut self, ctx: &egui::Context, status: &UiStatus) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let mut open = None;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Mesh").clicked() {
                        actions.push(UiAction::OpenMesh);
                    }
                    if ui.button("Save Screenshot").clicked() {
                        actions.push(UiAction::SaveScreenshot);
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        actions.push(UiAction::Exit);
                    }
                });
                ui.menu_button("View", |ui| {
                    view_entries(ui, status, &mut actions, &mut open);
                    ui.menu_button("Quality", |ui| {
                        quality_entries(ui, &mut actions);
                    });
                });
                ui.menu_button("Lighting", |ui| {
                    if ui.button("Configure Environment Light").clicked() {
                        open = Some(Dialog::Lighting);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        open = Some(Dialog::About);
                    }
                });
            });
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                view_entries(ui, status, &mut actions, &mut open);
                quality_entries(ui, &mut actions);
                let mut outline = status.outline_visible;
                if ui.toggle_value(&mut outline, "Toggle Outline").changed() {
                    actions.push(UiAction::SetOutline(outline));
                }
                if ui.button("Save Screenshot").clicked() {
                    actions.push(UiAction::SaveScreenshot);
                }
                if ui.button("Reload Mesh").clicked() {
                    actions.push(UiAction::OpenMesh);
                }
                if ui.button("Configure Environment Light").clicked() {
                    open = Some(Dialog::Lighting);
                }
                if ui.button("Exit").clicked() {
                    actions.push(UiAction::Exit);
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(format!(
                "{}  |  quality {} ({}x MSAA)",
                status.file_name, status.quality, status.sample_count
            ));
        });

        if let Some(dialog) = open {
            self.open(dialog, status);
        }
        if let Some(dialog) = self.dialog {
            self.show_dialog(ctx, dialog, &mut actions);
        }
        self.show_messages(ctx);

        actions
    }

    fn show_dialog(&mut self, ctx: &egui::Context, dialog: Dialog, actions: &mut Vec<UiAction>) {
        let title = match dialog {
            Dialog::Background => "Change Background",
            Dialog::ModelColor => "Change Model Color",
            Dialog::AutopanSpeed => "Set Autopan Speed",
            Dialog::Lighting => "Configure Environment Light",
            Dialog::About => "About",
        };

        let mut keep_open = true;
        let mut accepted = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .open(&mut keep_open)
            .show(ctx, |ui| {
                match dialog {
                    Dialog::Background | Dialog::ModelColor => {
                        ui.color_edit_button_rgb(&mut self.color_input);
                    }
                    Dialog::AutopanSpeed => {
                        ui.add(
                            egui::Slider::new(&mut self.speed_input, -360.0..=360.0)
                                .text("Degrees per step"),
                        );
                    }
                    Dialog::Lighting => {
                        let light = &mut self.light_input;
                        ui.add(egui::Slider::new(&mut light.ambient, 0.0..=1.0).text("Ambient"));
                        ui.add(egui::Slider::new(&mut light.intensity, 0.0..=10.0).text("Intensity"));
                        ui.add(egui::Slider::new(&mut light.specular, 0.0..=1.0).text("Specular"));
                        ui.add(
                            egui::Slider::new(&mut light.shininess, 1.0..=128.0)
                                .step_by(1.0)
                                .text("Shininess"),
                        );
                        ui.horizontal(|ui| {
                            ui.label("Color");
                            ui.color_edit_button_rgba_unmultiplied(&mut light.color);
                        });
                    }
                    Dialog::About => {
                        ui.label(ABOUT_TEXT);
                    }
                }
                if dialog != Dialog::About {
                    ui.separator();
                    accepted = ui.button("OK").clicked();
                }
            });

        if accepted {
            let [r, g, b] = self.color_input;
            let action = match dialog {
                Dialog::Background => Some(UiAction::SetBackground([r, g, b, 1.0])),
                Dialog::ModelColor => Some(UiAction::SetModelColor([r, g, b, 1.0])),
                Dialog::AutopanSpeed => Some(UiAction::SetAutopanSpeed(self.speed_input)),
                Dialog::Lighting => Some(UiAction::SetLighting(self.light_input.clamped())),
                Dialog::About => None,
            };
            actions.extend(action);
            keep_open = false;
        }
        if !keep_open {
            self.dialog = None;
        }
    }

    fn show_messages(&mut self, ctx: &egui::Context) {
        if let Some(message) = &self.error {
            let response = egui::Modal::new(egui::Id::new("error_modal")).show(ctx, |ui| {
                ui.heading("Error");
                ui.label(message);
                ui.button("OK").clicked()
            });
            if response.inner || response.should_close() {
                self.error = None;
            }
        } else if let Some(message) = &self.info {
            let mut open = true;
            let mut dismissed = false;
            egui::Window::new("Info")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(message);
                    dismissed = ui.button("OK").clicked();
                });
            if !open || dismissed {
                self.info = None;
            }
        }
    }
}

/// Entries shared by the View menu and the toolbar
fn view_entries(
    ui: &mut egui::Ui,
    status: &UiStatus,
    actions: &mut Vec<UiAction>,
    open: &mut Option<Dialog>,
) {
    if ui.button("Toggle Axis").clicked() {
        actions.push(UiAction::ToggleAxes);
    }
    if ui.button("Change Background").clicked() {
        *open = Some(Dialog::Background);
    }
    if ui.button("Change Model Color").clicked() {
        *open = Some(Dialog::ModelColor);
    }
    let mut autopan = status.autopan_enabled;
    if ui.checkbox(&mut autopan, "Autopan").changed() {
        actions.push(UiAction::SetAutopan(autopan));
    }
    if ui.button("Set Autopan Speed").clicked() {
        *open = Some(Dialog::AutopanSpeed);
    }
}

fn quality_entries(ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
    if ui.button("Increase Quality").clicked() {
        actions.push(UiAction::IncreaseQuality);
    }
    if ui.button("Decrease Quality").clicked() {
        actions.push(UiAction::DecreaseQuality);
    }
}

/// Next quality level, or `None` at the range limits
pub fn step_quality(quality: u32, increase: bool) -> Option<u32> {
    if increase {
        (quality < MAX_QUALITY).then_some(quality + 1)
    } else {
        quality.checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_steps_stay_in_range() {
        assert_eq!(step_quality(12, true), Some(13));
        assert_eq!(step_quality(MAX_QUALITY, true), None);
        assert_eq!(step_quality(1, false), Some(0));
        assert_eq!(step_quality(0, false), None);
    }

    #[test]
    fn error_window_holds_message() {
        let mut ui = ViewerUi::new();
        assert!(ui.error().is_none());
        ui.show_error("boom");
        assert_eq!(ui.error(), Some("boom"));
    }
}
