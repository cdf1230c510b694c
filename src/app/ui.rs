use super::DocumentUploader;
use crate::sync::{Operation, SyncPhase};
use crate::upload::FileCollector;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(0, 120, 212);
const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);

impl DocumentUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.heading("Document Uploader");
                ui.label(
                    RichText::new(&self.base_url)
                        .color(ui.visuals().text_color().gamma_multiply(0.6)),
                );

                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("🗑 Delete All").clicked() {
                        self.session.remove_all();
                    }
                    if ui.button("📤 Upload").clicked() {
                        self.session.open_upload_panel();
                    }
                    if ui.button("🔄 Refresh").clicked() {
                        self.session.load();
                    }
                });
            });

            ui.separator();
            ui.label(RichText::new("List of uploaded documents").strong());
            ui.add_space(5.0);

            self.render_documents(ui);

            ui.with_layout(egui::Layout::bottom_up(Align::Min), |ui| {
                ui.add_space(5.0);
                ui.label(self.session.status_text());
            });
        });

        self.render_upload_panel(ctx);
    }

    fn render_documents(&mut self, ui: &mut egui::Ui) {
        if self.session.documents().is_empty() {
            let text = match self.session.phase(Operation::Load) {
                SyncPhase::InFlight => "Loading...",
                _ => "No documents uploaded yet",
            };
            ui.label(RichText::new(text).italics());
            return;
        }

        let mut removed = None;
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 30.0).max(60.0))
            .show(ui, |ui| {
                for id in self.session.documents() {
                    ui.horizontal(|ui| {
                        ui.colored_label(ACCENT, "📄");
                        ui.label(id);
                        if ui
                            .small_button("✖")
                            .on_hover_text("Remove")
                            .clicked()
                        {
                            removed = Some(id.clone());
                        }
                    });
                }
            });

        if let Some(id) = removed {
            self.session.remove_one(&id);
        }
    }

    fn render_upload_panel(&mut self, ctx: &egui::Context) {
        if !self.session.is_upload_panel_open() {
            return;
        }

        let mut open = true;
        egui::Window::new("File Upload")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(480.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("📄 Select Files").clicked() {
                        if let Some(paths) = FileDialog::new().pick_files() {
                            self.session.add_pending(FileCollector::from_paths(&paths));
                        }
                    }
                    if ui.button("📁 Select Folder").clicked() {
                        if let Some(path) = FileDialog::new().pick_folder() {
                            self.session.add_pending(FileCollector::from_folder(&path));
                        }
                    }
                });

                ui.add_space(8.0);

                let pending = self.session.pending();
                if pending.is_empty() {
                    ui.label(
                        RichText::new("No files selected")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                } else {
                    egui::ScrollArea::vertical()
                        .max_height(150.0)
                        .show(ui, |ui| {
                            egui::Frame::none()
                                .fill(ui.style().visuals.extreme_bg_color)
                                .show(ui, |ui| {
                                    for file in pending.files() {
                                        ui.horizontal(|ui| {
                                            ui.label(&file.relative_path);
                                            ui.label(
                                                RichText::new(file.display_size()).color(
                                                    ui.visuals().text_color().gamma_multiply(0.6),
                                                ),
                                            );
                                        });
                                    }
                                });
                        });
                    ui.label(format!("{} files selected", pending.len()));
                }

                ui.add_space(8.0);

                let can_upload = self.session.can_submit();
                ui.add_enabled_ui(can_upload, |ui| {
                    let button = egui::Button::new("📤 Upload").min_size(egui::vec2(120.0, 30.0));
                    if ui.add(button).clicked() {
                        self.session.submit();
                    }
                });

                if let Some(error) = self.session.error_message() {
                    ui.add_space(5.0);
                    ui.colored_label(ERROR_RED, error);
                }
            });

        if !open {
            self.session.dismiss_upload_panel();
        }
    }
}
