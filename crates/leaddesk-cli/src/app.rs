use chrono::{Local, NaiveDate};
use leaddesk_core::bus::{AppEvent, NotificationBus, Topic};
use leaddesk_core::views::PAGE_SIZES;
use leaddesk_storage::{FollowUpStore, KvStore, LeadStore};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

pub const DATA_DIR_ENV: &str = "LEADDESK_DATA_DIR";
const DATA_DIR_NAME: &str = "leaddesk";

// Transient per-invocation state of the lead panel, kept in sync over the
// notification bus rather than by direct calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPanel {
    pub query: String,
    pub editing: Option<String>,
    pub focused: bool,
}

pub struct App {
    pub leads: LeadStore,
    pub follow_ups: FollowUpStore,
    bus: NotificationBus,
    lead_panel: Rc<RefCell<LeadPanel>>,
}

impl App {
    pub fn open(data_dir: Option<PathBuf>) -> Self {
        let dir = resolve_data_dir(data_dir);
        debug!(dir = %dir.display(), "opening data directory");
        Self::with_kv(KvStore::open(dir))
    }

    pub fn with_kv(kv: KvStore) -> Self {
        let leads = LeadStore::open(kv.clone());
        let follow_ups = FollowUpStore::open(kv);
        let bus = NotificationBus::new();
        let lead_panel = Rc::new(RefCell::new(LeadPanel::default()));

        let panel = Rc::clone(&lead_panel);
        bus.subscribe(Topic::LeadSearch, move |event| {
            if let AppEvent::LeadSearch { query } = event {
                panel.borrow_mut().query = query.clone();
            }
        });
        let panel = Rc::clone(&lead_panel);
        bus.subscribe(Topic::OpenAddLead, move |_| {
            panel.borrow_mut().editing = None;
        });
        let panel = Rc::clone(&lead_panel);
        bus.subscribe(Topic::FocusLeadForm, move |_| {
            panel.borrow_mut().focused = true;
        });

        Self {
            leads,
            follow_ups,
            bus,
            lead_panel,
        }
    }

    // Routes the query over the bus and reads the effective filter back from
    // the panel, so list output always reflects what subscribers saw.
    pub fn search_leads(&self, query: &str) -> String {
        let delivered = self.bus.publish(&AppEvent::LeadSearch {
            query: query.to_string(),
        });
        if delivered == 0 {
            debug!(topic = %Topic::LeadSearch, "event had no subscribers");
        }
        self.lead_panel().query
    }

    pub fn begin_add_lead(&self) {
        self.bus.publish(&AppEvent::OpenAddLead);
        let delivered = self.bus.publish(&AppEvent::FocusLeadForm);
        if delivered == 0 {
            debug!(topic = %Topic::FocusLeadForm, "event had no subscribers");
        }
        let panel = self.lead_panel.borrow();
        debug!(focused = panel.focused, editing = ?panel.editing, "lead form ready");
    }

    pub fn begin_edit_lead(&self, id: &str) {
        self.lead_panel.borrow_mut().editing = Some(id.to_string());
    }

    pub fn end_edit_lead(&self) {
        let mut panel = self.lead_panel.borrow_mut();
        panel.editing = None;
        panel.focused = false;
    }

    pub fn lead_panel(&self) -> LeadPanel {
        self.lead_panel.borrow().clone()
    }
}

fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Ok(value) = std::env::var(DATA_DIR_ENV) {
        if !value.trim().is_empty() {
            return PathBuf::from(value);
        }
    }
    match dirs::data_dir() {
        Some(base) => base.join(DATA_DIR_NAME),
        None => PathBuf::from(".leaddesk"),
    }
}

pub fn parse_page_size(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .parse()
        .map_err(|_| format!("invalid page size: {raw}"))?;
    if PAGE_SIZES.contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "page size must be one of {}",
            PAGE_SIZES.map(|size| size.to_string()).join(", ")
        ))
    }
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}
