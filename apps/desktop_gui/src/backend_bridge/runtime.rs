//! Backend worker thread: owns the tokio runtime and the customers session.

use std::thread;

use client_core::{ClientSettings, CustomersSession, SubmitError};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error, info};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || run_backend(settings, cmd_rx, ui_tx));
}

fn report(ui_tx: &Sender<UiEvent>, context: UiErrorContext, message: impl Into<String>) {
    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(context, message)));
}

fn run_backend(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "failed to build backend runtime");
            report(
                &ui_tx,
                UiErrorContext::BackendStartup,
                format!("failed to build backend runtime: {err}"),
            );
            return;
        }
    };

    let session = match CustomersSession::connect(&settings, runtime.handle().clone()) {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "customers session could not start");
            report(&ui_tx, UiErrorContext::BackendStartup, err.to_string());
            return;
        }
    };
    let _ = ui_tx.try_send(UiEvent::SessionReady(session.clone()));

    while let Ok(cmd) = cmd_rx.recv() {
        debug!(command = cmd.name(), "backend received command");
        match cmd {
            BackendCommand::Revalidate => {
                let _ = session.list.revalidate();
            }
            BackendCommand::SubmitDraft => {
                let form = session.form.clone();
                let ui_tx = ui_tx.clone();
                runtime.spawn(async move {
                    match form.submit().await {
                        Ok(created) => {
                            let _ = ui_tx.try_send(UiEvent::CustomerCreated {
                                email: created.map(|customer| customer.email),
                            });
                        }
                        Err(SubmitError::Rejected { message }) => {
                            report(&ui_tx, UiErrorContext::CreateCustomer, message);
                        }
                        Err(refusal) => debug!(reason = %refusal, "submit command dropped"),
                    }
                });
            }
        }
    }

    info!("ui command queue closed; backend worker exiting");
}
