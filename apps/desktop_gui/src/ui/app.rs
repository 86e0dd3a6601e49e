use std::time::Duration;

use client_core::{KeyPress, Messages};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Operator;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, keymap::keys_from_events, session::CalculatorSession};

const KEYPAD_ROWS: [&[KeyPress]; 5] = [
    &[
        KeyPress::Clear,
        KeyPress::Delete,
        KeyPress::Operator(Operator::Div),
        KeyPress::Operator(Operator::Mul),
    ],
    &[
        KeyPress::Digit(7),
        KeyPress::Digit(8),
        KeyPress::Digit(9),
        KeyPress::Operator(Operator::Sub),
    ],
    &[
        KeyPress::Digit(4),
        KeyPress::Digit(5),
        KeyPress::Digit(6),
        KeyPress::Operator(Operator::Add),
    ],
    &[
        KeyPress::Digit(1),
        KeyPress::Digit(2),
        KeyPress::Digit(3),
        KeyPress::Equals,
    ],
    &[KeyPress::Digit(0), KeyPress::Decimal],
];
const BUTTON_SIZE: egui::Vec2 = egui::vec2(72.0, 52.0);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(253, 164, 175);
const ACCENT_COLOR: egui::Color32 = egui::Color32::from_rgb(79, 70, 229);
const DANGER_COLOR: egui::Color32 = egui::Color32::from_rgb(225, 29, 72);
const OPERATOR_COLOR: egui::Color32 = egui::Color32::from_rgb(51, 65, 85);

pub struct CalculatorApp {
    session: CalculatorSession,
    ui_rx: Receiver<UiEvent>,
}

impl CalculatorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        messages: &'static Messages,
    ) -> Self {
        let mut session = CalculatorSession::new(cmd_tx, messages);
        session.refresh_stats();
        Self { session, ui_rx }
    }

    fn messages(&self) -> &'static Messages {
        self.session.keypad().messages()
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.session.handle_event(event);
        }
    }

    fn process_keyboard(&mut self, ctx: &egui::Context) {
        let keys = ctx.input(|input| keys_from_events(&input.events));
        for key in keys {
            self.session.press(key);
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        let messages = self.messages();
        ui.heading(messages.title);
        ui.horizontal(|ui| {
            let pending = self
                .session
                .keypad()
                .pending()
                .map(|(first, symbol)| format!("{first} {symbol}"))
                .unwrap_or_default();
            ui.label(egui::RichText::new(pending).weak());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(count) = self.session.today_count() {
                    ui.small(format!("{}: {count}", messages.today_count));
                }
                ui.small(messages.server_side_caption);
            });
        });
    }

    fn show_display(&self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(self.session.keypad().display())
                        .size(32.0)
                        .monospace(),
                );
            });
        });

        ui.horizontal(|ui| {
            ui.set_min_height(20.0);
            if let Some(message) = self.session.keypad().error_message() {
                ui.colored_label(ERROR_COLOR, message);
            } else if self.session.keypad().is_loading() {
                ui.small(self.messages().evaluating);
            }
        });
    }

    fn show_keypad(&mut self, ui: &mut egui::Ui) {
        let spacing = ui.spacing().item_spacing.x;
        let mut pressed = None;

        for row in KEYPAD_ROWS {
            ui.horizontal(|ui| {
                for &key in row {
                    let size = if key == KeyPress::Digit(0) {
                        egui::vec2(BUTTON_SIZE.x * 2.0 + spacing, BUTTON_SIZE.y)
                    } else {
                        BUTTON_SIZE
                    };
                    // While a request is in flight `=` is disabled and spins.
                    let busy = key == KeyPress::Equals && !self.session.keypad().can_evaluate();
                    let label = if busy { String::new() } else { key.label() };
                    let button = egui::Button::new(egui::RichText::new(label).size(18.0))
                        .min_size(size)
                        .fill(button_fill(key));
                    let response = ui.add_enabled(!busy, button);
                    if busy {
                        let side = size.y * 0.5;
                        let spinner_rect = egui::Rect::from_center_size(
                            response.rect.center(),
                            egui::vec2(side, side),
                        );
                        egui::Spinner::new().size(side).paint_at(ui, spinner_rect);
                    }
                    if response.clicked() {
                        pressed = Some(key);
                    }
                }
            });
        }

        if let Some(key) = pressed {
            self.session.press(key);
        }
    }
}

fn button_fill(key: KeyPress) -> egui::Color32 {
    match key {
        KeyPress::Equals => ACCENT_COLOR,
        KeyPress::Clear | KeyPress::Delete => DANGER_COLOR,
        KeyPress::Operator(_) => OPERATOR_COLOR,
        _ => egui::Color32::TRANSPARENT,
    }
}

impl eframe::App for CalculatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.process_keyboard(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.small(self.session.status());
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_header(ui);
            ui.add_space(6.0);
            self.show_display(ui);
            ui.add_space(6.0);
            self.show_keypad(ui);
        });

        if self.session.keypad().is_loading() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
