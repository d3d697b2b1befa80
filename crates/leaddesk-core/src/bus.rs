use std::cell::RefCell;
use std::fmt;

pub type SubscriberId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    LeadSearch,
    OpenAddLead,
    FocusLeadForm,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::LeadSearch => "lead-search",
            Topic::OpenAddLead => "open-add-lead",
            Topic::FocusLeadForm => "focus-lead-form",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    LeadSearch { query: String },
    OpenAddLead,
    FocusLeadForm,
}

impl AppEvent {
    pub fn topic(&self) -> Topic {
        match self {
            AppEvent::LeadSearch { .. } => Topic::LeadSearch,
            AppEvent::OpenAddLead => Topic::OpenAddLead,
            AppEvent::FocusLeadForm => Topic::FocusLeadForm,
        }
    }
}

type Handler = Box<dyn FnMut(&AppEvent)>;

struct Subscriber {
    id: SubscriberId,
    topic: Topic,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    next_id: SubscriberId,
    subscribers: Vec<Subscriber>,
}

#[derive(Default)]
pub struct NotificationBus {
    inner: RefCell<BusInner>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriberId
    where
        F: FnMut(&AppEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.subscribers.push(Subscriber {
            id,
            topic,
            handler: Box::new(handler),
        });
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|subscriber| subscriber.id != id);
        inner.subscribers.len() < before
    }

    // Handlers run in subscription order and must not publish or subscribe
    // from inside a delivery; the bus stays borrowed until every handler for
    // the topic has run. Returns how many handlers saw the event.
    pub fn publish(&self, event: &AppEvent) -> usize {
        let topic = event.topic();
        let mut inner = self.inner.borrow_mut();
        let mut delivered = 0;
        for subscriber in inner.subscribers.iter_mut() {
            if subscriber.topic == topic {
                (subscriber.handler)(event);
                delivered += 1;
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn delivers_in_subscription_order() {
        let bus = NotificationBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        bus.subscribe(Topic::OpenAddLead, move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&seen);
        bus.subscribe(Topic::OpenAddLead, move |_| second.borrow_mut().push("second"));

        let delivered = bus.publish(&AppEvent::OpenAddLead);
        assert_eq!(delivered, 2);
        assert_eq!(*seen.borrow(), ["first", "second"]);
    }

    #[test]
    fn search_payload_reaches_the_handler_intact() {
        let bus = NotificationBus::new();
        let captured = Rc::new(RefCell::new(String::new()));

        let sink = Rc::clone(&captured);
        bus.subscribe(Topic::LeadSearch, move |event| {
            if let AppEvent::LeadSearch { query } = event {
                *sink.borrow_mut() = query.clone();
            }
        });

        bus.publish(&AppEvent::LeadSearch {
            query: "ada lovelace".to_string(),
        });
        assert_eq!(*captured.borrow(), "ada lovelace");
    }

    #[test]
    fn publish_without_subscribers_reports_zero() {
        let bus = NotificationBus::new();
        assert_eq!(bus.publish(&AppEvent::FocusLeadForm), 0);
    }

    #[test]
    fn events_stay_on_their_topic() {
        let bus = NotificationBus::new();
        let hits = Rc::new(RefCell::new(0_u32));

        let sink = Rc::clone(&hits);
        bus.subscribe(Topic::OpenAddLead, move |_| *sink.borrow_mut() += 1);

        bus.publish(&AppEvent::LeadSearch {
            query: String::new(),
        });
        bus.publish(&AppEvent::FocusLeadForm);
        assert_eq!(*hits.borrow(), 0);

        bus.publish(&AppEvent::OpenAddLead);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn unsubscribed_handlers_stop_receiving() {
        let bus = NotificationBus::new();
        let hits = Rc::new(RefCell::new(0_u32));

        let sink = Rc::clone(&hits);
        let id = bus.subscribe(Topic::FocusLeadForm, move |_| *sink.borrow_mut() += 1);

        bus.publish(&AppEvent::FocusLeadForm);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&AppEvent::FocusLeadForm);
        assert_eq!(*hits.borrow(), 1);
    }
}
