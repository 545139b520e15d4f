//! Nullable payment gateway: records pushes without charging anyone.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use fichua_gateway::{GatewayError, PaymentGateway};
use fichua_types::{Amount, GatewayTxnId, Msisdn};

/// One push prompt the controller asked for.
#[derive(Clone, Debug)]
pub struct RecordedPush {
    pub phone: Msisdn,
    pub amount: Amount,
    pub reference: String,
}

/// A test gateway that records push initiations instead of sending them.
///
/// By default every push is accepted with transaction ids `TX1`, `TX2`,
/// ... in order. Scripted responses (errors included) can be enqueued to
/// take precedence.
pub struct NullGateway {
    pushes: Mutex<Vec<RecordedPush>>,
    scripted: Mutex<VecDeque<Result<GatewayTxnId, GatewayError>>>,
    counter: AtomicU64,
}

impl NullGateway {
    pub fn new() -> Self {
        Self {
            pushes: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// Enqueue the response for the next push initiation.
    pub fn enqueue_response(&self, response: Result<GatewayTxnId, GatewayError>) {
        self.scripted.lock().unwrap().push_back(response);
    }

    /// All pushes "sent" so far (for assertions).
    pub fn pushes(&self) -> Vec<RecordedPush> {
        self.pushes.lock().unwrap().clone()
    }

    /// Number of push initiations seen.
    pub fn push_count(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }
}

impl Default for NullGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for NullGateway {
    async fn initiate_push(
        &self,
        phone: &Msisdn,
        amount: Amount,
        reference: &str,
    ) -> Result<GatewayTxnId, GatewayError> {
        self.pushes.lock().unwrap().push(RecordedPush {
            phone: phone.clone(),
            amount,
            reference: reference.to_string(),
        });
        if let Some(scripted) = self.scripted.lock().unwrap().pop_front() {
            return scripted;
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GatewayTxnId::new(format!("TX{n}")))
    }
}
