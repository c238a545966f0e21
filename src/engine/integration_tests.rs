use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

use crate::engine::HandlerChain;
use crate::errors::HandlerError;
use crate::handlers::local::MemoryHandler;
use crate::handlers::{message_filter, Inbox, QueueOptions, QueuedHandler};
use crate::message::{Facility, LogMessage, Message, Severity};
use crate::traits::Handler;

/// Integration tests for the handler chain using real queued handlers
#[cfg(test)]
mod tests {
    use super::*;

    /// Queued handler whose consumer waits for a gate before draining and
    /// records its name in a shared journal right before confirming shutdown.
    struct GatedHandler {
        base: QueuedHandler,
    }

    impl GatedHandler {
        fn spawn(
            name: &str,
            capacity: usize,
            gate: Arc<Notify>,
            journal: Arc<Mutex<Vec<String>>>,
            consumed: Arc<Mutex<usize>>,
        ) -> Self {
            let (base, inbox) = QueuedHandler::new(name, QueueOptions::new(capacity, false), None);
            tokio::spawn(Self::consume(inbox, gate, journal, consumed));
            Self { base }
        }

        async fn consume(
            mut inbox: Inbox,
            gate: Arc<Notify>,
            journal: Arc<Mutex<Vec<String>>>,
            consumed: Arc<Mutex<usize>>,
        ) -> Result<(), HandlerError> {
            gate.notified().await;
            while inbox.get().await.is_some() {
                *consumed.lock().await += 1;
            }
            journal.lock().await.push(inbox.name().to_string());
            inbox.end()
        }
    }

    #[async_trait::async_trait]
    impl Handler for GatedHandler {
        async fn handle(&self, message: Option<Message>) -> Result<Option<Message>, HandlerError> {
            self.base.handle(message).await
        }

        fn name(&self) -> &str {
            self.base.name()
        }
    }

    fn error(content: &str) -> Message {
        LogMessage::new(content).with_severity(Severity::Error).into_message()
    }

    #[tokio::test]
    async fn test_filter_and_forwarding_route_through_chain() {
        let errors = Arc::new(MemoryHandler::spawn(
            "errors",
            QueueOptions::new(16, true),
            Some(message_filter(|m| m.severity.at_least(Severity::Error))),
        ));
        let auth = Arc::new(MemoryHandler::spawn(
            "auth",
            QueueOptions::new(16, false),
            Some(message_filter(|m| m.facility == Facility::Auth)),
        ));
        let tail = Arc::new(MemoryHandler::spawn("tail", QueueOptions::new(16, false), None));
        let (errors_sink, auth_sink, tail_sink) = (errors.sink(), auth.sink(), tail.sink());

        let mut chain = HandlerChain::new();
        chain.push("errors", errors);
        chain.push("auth", auth);
        chain.push("tail", tail);

        // queued by "errors" and forwarded; "auth" rejects it and does not forward
        assert!(chain.dispatch(error("disk failed")).await.unwrap().is_none());

        // skipped but forwarded by "errors"; queued and consumed by "auth"
        let login = LogMessage::new("login").with_facility(Facility::Auth).into_message();
        assert!(chain.dispatch(login).await.unwrap().is_none());

        chain.shutdown().await.unwrap();

        let errors_seen = errors_sink.snapshot().await;
        assert_eq!(errors_seen.len(), 1);
        assert_eq!(errors_seen[0].content, "disk failed");

        let auth_seen = auth_sink.snapshot().await;
        assert_eq!(auth_seen.len(), 1);
        assert_eq!(auth_seen[0].content, "login");

        assert!(tail_sink.is_empty().await);
    }

    #[tokio::test]
    async fn test_forwarding_handlers_all_see_the_same_message() {
        let first = Arc::new(MemoryHandler::spawn("first", QueueOptions::new(4, true), None));
        let second = Arc::new(MemoryHandler::spawn("second", QueueOptions::new(4, true), None));
        let (first_sink, second_sink) = (first.sink(), second.sink());

        let mut chain = HandlerChain::new();
        chain.push("first", first);
        chain.push("second", second);

        let input = error("shared");
        let out = chain.dispatch(Arc::clone(&input)).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&out, &input));

        chain.shutdown().await.unwrap();
        assert!(Arc::ptr_eq(&first_sink.snapshot().await[0], &input));
        assert!(Arc::ptr_eq(&second_sink.snapshot().await[0], &input));
    }

    #[tokio::test]
    async fn test_slow_consumer_never_stalls_dispatch() {
        let gate = Arc::new(Notify::new());
        let journal = Arc::new(Mutex::new(Vec::new()));
        let consumed = Arc::new(Mutex::new(0));

        let mut chain = HandlerChain::new();
        chain.push(
            "slow",
            Arc::new(GatedHandler::spawn("slow", 4, gate.clone(), journal.clone(), consumed.clone())),
        );

        let flood = async {
            for i in 0..1_000 {
                chain.dispatch(error(&format!("m{}", i))).await.unwrap();
            }
        };
        tokio::time::timeout(Duration::from_secs(5), flood)
            .await
            .expect("dispatch must not wait for the consumer");

        gate.notify_one();
        chain.shutdown().await.unwrap();

        assert_eq!(*consumed.lock().await, 4);
        assert_eq!(*journal.lock().await, vec!["slow".to_string()]);
    }

    #[tokio::test]
    async fn test_shutdown_completes_in_chain_order() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let consumed = Arc::new(Mutex::new(0));

        let mut chain = HandlerChain::new();
        let mut gates = Vec::new();
        for name in ["first", "second", "third"] {
            let gate = Arc::new(Notify::new());
            gates.push(gate.clone());
            chain.push(
                name,
                Arc::new(GatedHandler::spawn(name, 8, gate, journal.clone(), consumed.clone())),
            );
        }

        for i in 0..3 {
            chain.dispatch(error(&format!("m{}", i))).await.unwrap();
        }

        // release in reverse; completion order still follows the chain
        for gate in gates.iter().rev() {
            gate.notify_one();
        }
        chain.shutdown().await.unwrap();

        assert_eq!(*journal.lock().await, vec!["first", "second", "third"]);
        // only the first handler sees messages; it consumes them without forwarding
        assert_eq!(*consumed.lock().await, 3);
    }
}
