use eframe::egui;

use crate::config::DashboardConfig;
use crate::data::model::SalesRecord;
use crate::data::schema::{SupermarketRow, SuperstoreRow};
use crate::pages::{Page, SUPERMARKET, SUPERSTORE};
use crate::state::PageState;
use crate::ui::panels::TopBarAction;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalesDashboardApp {
    pub active: Page,
    pub superstore: PageState<SuperstoreRow>,
    pub supermarket: PageState<SupermarketRow>,
}

impl SalesDashboardApp {
    /// Build both pages and load their sources once. A page whose source
    /// fails keeps the error as its status message.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut superstore = PageState::new(&SUPERSTORE, config.source(Page::Superstore).clone());
        let mut supermarket =
            PageState::new(&SUPERMARKET, config.source(Page::Supermarket).clone());
        // failures are logged and shown by the page itself
        let _ = superstore.load();
        let _ = supermarket.load();

        Self {
            active: config.start_page,
            superstore,
            supermarket,
        }
    }
}

impl eframe::App for SalesDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.active {
            Page::Superstore => show_page(ctx, &mut self.active, &mut self.superstore),
            Page::Supermarket => show_page(ctx, &mut self.active, &mut self.supermarket),
        }
    }
}

fn show_page<R: SalesRecord>(ctx: &egui::Context, active: &mut Page, page: &mut PageState<R>) {
    // ---- Top panel: menu bar ----
    let action = egui::TopBottomPanel::top("top_bar")
        .show(ctx, |ui| panels::top_bar(ui, active, page))
        .inner;
    if let Some(TopBarAction::Open(path)) = action {
        if page.open(path).is_ok() {
            log::info!("{} page now reads {}", R::DATASET, page.source.path.display());
        }
    }

    // ---- Left side panel: filters ----
    egui::SidePanel::left("filter_panel")
        .default_width(240.0)
        .resizable(true)
        .show(ctx, |ui| {
            panels::side_panel(ui, page);
        });

    // ---- Central panel: KPIs and charts ----
    egui::CentralPanel::default().show(ctx, |ui| {
        dashboard::central_panel(ui, page);
    });
}
