use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, error::TryRecvError, unbounded_channel,
};

use crate::dom::Element;

/// Lifecycle notifications a modal view publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalSignal {
    /// Show has begun.
    Show,
    /// Hide has begun. Carries the element that requested the hide, if any.
    Hide { opener: Option<Element> },
    /// Hide has finished, including any animation.
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receiving end of one subscription. Dropping it or calling
/// `ModalSignalHub::unsubscribe` ends delivery.
#[derive(Debug)]
pub struct ModalSubscription {
    id: SubscriptionId,
    rx: UnboundedReceiver<ModalSignal>,
}

impl ModalSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn drain(&mut self) -> Vec<ModalSignal> {
        let mut drained = Vec::new();

        loop {
            match self.rx.try_recv() {
                Ok(signal) => drained.push(signal),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }

        drained
    }
}

/// Subscriber registry embedded by modal views.
#[derive(Debug, Default)]
pub struct ModalSignalHub {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, UnboundedSender<ModalSignal>)>,
}

impl ModalSignalHub {
    pub fn subscribe(&mut self) -> ModalSubscription {
        self.next_id = self.next_id.saturating_add(1);
        let id = SubscriptionId(self.next_id);
        let (tx, rx) = unbounded_channel();
        self.subscribers.push((id, tx));
        ModalSubscription { id, rx }
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Delivers to every live subscriber and prunes dropped ones.
    pub fn emit(&mut self, signal: ModalSignal) {
        self.subscribers
            .retain(|(_, tx)| tx.send(signal.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
