use std::{env, time::Duration};

use activity_board_lib::api::ApiClient;
use eframe::{CreationContext, NativeOptions};
use egui::CentralPanel;
use once_cell::sync::Lazy;
use reqwest::Url;

mod activity_list;
mod localdata;
mod signup;

use activity_list::ActivityListView;
use signup::SignupController;

static SERVER_ADDR: Lazy<String> = Lazy::new(|| {
    env::var("ACTIVITY_SERVER").unwrap_or_else(|_| "http://localhost:8000/".into())
});

#[tokio::main]
async fn main() {
    let native_options = NativeOptions {
        initial_window_size: Some((480., 720.).into()),
        ..Default::default()
    };
    eframe::run_native(
        "Activity Board",
        native_options,
        Box::new(|cc| Box::new(Application::new(cc))),
    )
    .unwrap();
}

struct Application {
    list: ActivityListView,
    controller: SignupController,
}

impl Application {
    fn new(_cc: &CreationContext<'_>) -> Self {
        let api = ApiClient::new(Url::parse(&SERVER_ADDR).expect("invalid server address"));

        let list = ActivityListView::new(api.clone());
        list.refresh();

        Self {
            list,
            controller: SignupController::new(api, localdata::get_localdata().email),
        }
    }
}

impl eframe::App for Application {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        if self.controller.poll() {
            self.list.refresh();
        }

        CentralPanel::default().show(ctx, |ui| {
            ui.heading("Activity Board");
            ui.add_space(8.0);

            self.controller.show_form(ui, &self.list.options());
            ui.separator();

            if let Some((activity, email)) = self.list.show(ui) {
                self.controller.unregister(&activity, &email);
            }
        });

        // Keep polling while request tasks are in flight.
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}
