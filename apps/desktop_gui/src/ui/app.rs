use std::time::Duration;

use client_core::{
    render::{ListView, COLUMN_HEADERS, LOADING_TEXT},
    CustomersSession, FormSnapshot,
};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use eframe::egui;
use shared::{domain::CustomerField, protocol::CustomerDraft};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{UiError, UiErrorContext, UiEvent},
        orchestration::dispatch_backend_command,
    },
};

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);

pub struct CustomersApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session: Option<CustomersSession>,
    status: String,
    startup_error: Option<UiError>,
    /// Text-edit buffers, overwritten from the form draft every frame.
    draft_buffer: CustomerDraft,
}

impl CustomersApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            session: None,
            status: "Connecting...".to_string(),
            startup_error: None,
            draft_buffer: CustomerDraft::default(),
        }
    }

    fn process_ui_events(&mut self) {
        loop {
            match self.ui_rx.try_recv() {
                Ok(UiEvent::SessionReady(session)) => {
                    self.session = Some(session);
                    self.status.clear();
                }
                Ok(UiEvent::CustomerCreated { email }) => {
                    self.status = match email {
                        Some(email) => format!("Customer {email} created"),
                        None => "Customer created".to_string(),
                    };
                }
                Ok(UiEvent::Error(err)) => {
                    self.status = err.status_line();
                    if err.context() == UiErrorContext::BackendStartup {
                        self.startup_error = Some(err);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.session.is_none() && self.startup_error.is_none() {
                        self.status = "Backend worker stopped before the session started".into();
                    }
                    break;
                }
            }
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        let session = self.session.clone();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Customers");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let ready = session.is_some();
                    if ui
                        .add_enabled(ready, egui::Button::new("+ Add Customer"))
                        .clicked()
                    {
                        if let Some(session) = &session {
                            session.form.open();
                        }
                    }
                    let refreshing = session
                        .as_ref()
                        .is_some_and(|session| session.list.snapshot().is_validating());
                    if ui
                        .add_enabled(ready && !refreshing, egui::Button::new("Refresh"))
                        .clicked()
                    {
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::Revalidate,
                            &mut self.status,
                        );
                    }
                    if refreshing {
                        ui.spinner();
                    }
                });
            });
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        if self.status.is_empty() {
            return;
        }
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(&self.status);
        });
    }

    fn show_customer_table(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.session else {
                match &self.startup_error {
                    Some(err) => {
                        ui.colored_label(ERROR_COLOR, err.message());
                    }
                    None => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Connecting...");
                        });
                    }
                }
                return;
            };

            match ListView::from_snapshot(&session.list.snapshot()) {
                ListView::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(LOADING_TEXT);
                    });
                }
                ListView::Error(message) => {
                    ui.colored_label(ERROR_COLOR, message);
                }
                ListView::Table(rows) => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        egui::Grid::new("customers_table")
                            .num_columns(COLUMN_HEADERS.len())
                            .striped(true)
                            .spacing([24.0, 6.0])
                            .show(ui, |ui| {
                                for header in COLUMN_HEADERS {
                                    ui.strong(header);
                                }
                                ui.end_row();
                                for row in &rows {
                                    for cell in &row.cells {
                                        ui.label(cell);
                                    }
                                    ui.end_row();
                                }
                            });
                        if rows.is_empty() {
                            ui.add_space(8.0);
                            ui.weak("No customers yet.");
                        }
                    });
                }
            }
        });
    }

    fn show_add_customer_dialog(&mut self, ctx: &egui::Context) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let form: FormSnapshot = session.form.snapshot();
        if !form.is_open() {
            return;
        }
        self.draft_buffer = form.draft.clone();

        let mut cancel = false;
        let mut submit = false;
        egui::Window::new("Add Customer")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("add_customer_fields")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        for field in CustomerField::ALL {
                            if field.is_required() {
                                ui.label(format!("{} *", field.label()));
                            } else {
                                ui.label(field.label());
                            }
                            let response = ui.add_enabled(
                                !form.submitting,
                                egui::TextEdit::singleline(self.draft_buffer.field_mut(field))
                                    .desired_width(240.0),
                            );
                            if response.changed() {
                                session.form.set_field(field, self.draft_buffer.field(field));
                            }
                            ui.end_row();
                        }
                    });

                if let Some(notice) = &form.notice {
                    ui.add_space(4.0);
                    ui.colored_label(ERROR_COLOR, notice);
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!form.submitting, egui::Button::new("Cancel"))
                        .clicked()
                    {
                        cancel = true;
                    }
                    if ui
                        .add_enabled(form.can_submit(), egui::Button::new("Add"))
                        .clicked()
                    {
                        submit = true;
                    }
                    if form.submitting {
                        ui.spinner();
                    }
                });
            });

        if cancel {
            session.form.cancel();
        } else if submit {
            dispatch_backend_command(&self.cmd_tx, BackendCommand::SubmitDraft, &mut self.status);
        }
    }
}

impl eframe::App for CustomersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        self.show_customer_table(ctx);
        self.show_add_customer_dialog(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
