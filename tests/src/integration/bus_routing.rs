//! # Bus Routing
//!
//! Subject filtering, per-subject ordering, and stream consumption against
//! the in-memory bus.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use relay_bus::{InMemoryMessageBus, MessageSender, SubjectFilter};
    use shared_types::{Message, PartKey};

    #[tokio::test]
    async fn test_fifo_per_sender_subject_pair() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let mut sub = bus.subscribe(SubjectFilter::subject("Mailbox"));

        for seq in 0..100 {
            bus.send(Message::new("Mailbox").with_str(PartKey::Custom("Seq".to_owned()), seq.to_string()))
                .await;
        }

        for seq in 0..100 {
            let message = timeout(Duration::from_millis(200), sub.recv())
                .await
                .expect("timeout")
                .expect("message");
            assert_eq!(
                message.get_str(&PartKey::Custom("Seq".to_owned())),
                Some(seq.to_string().as_str()),
                "messages must arrive in publication order"
            );
        }
    }

    #[tokio::test]
    async fn test_interleaved_subjects_keep_relative_order() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let mut mailbox = bus.subscribe(SubjectFilter::subject("Mailbox"));
        let mut audit = bus.subscribe(SubjectFilter::subject("Audit"));

        for seq in 0..10 {
            bus.send(Message::new("Mailbox").with_str(PartKey::Custom("Seq".to_owned()), seq.to_string()))
                .await;
            bus.send(Message::new("Audit").with_str(PartKey::Custom("Seq".to_owned()), seq.to_string()))
                .await;
        }

        for seq in 0..10 {
            let m = timeout(Duration::from_millis(200), mailbox.recv())
                .await
                .expect("timeout")
                .expect("message");
            let a = timeout(Duration::from_millis(200), audit.recv())
                .await
                .expect("timeout")
                .expect("message");
            assert_eq!(
                m.get_str(&PartKey::Custom("Seq".to_owned())),
                Some(seq.to_string().as_str())
            );
            assert_eq!(
                a.get_str(&PartKey::Custom("Seq".to_owned())),
                Some(seq.to_string().as_str())
            );
        }
    }

    #[tokio::test]
    async fn test_send_without_subscribers_is_dropped() {
        let bus = InMemoryMessageBus::new();

        let receivers = bus.send(Message::new("Nowhere")).await;
        assert_eq!(receivers, 0);
        assert_eq!(bus.messages_sent(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_only_sees_matching_subjects() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let mut sub = bus.subscribe(SubjectFilter::subject("LoginClient"));

        bus.send(Message::new("AdminPanel")).await;
        bus.send(Message::new("Mailbox")).await;
        bus.send(Message::new("LoginClient")).await;

        let received = timeout(Duration::from_millis(200), sub.recv())
            .await
            .expect("timeout")
            .expect("message");
        assert_eq!(received.subject(), "LoginClient");

        // Nothing else matches the filter.
        assert!(matches!(sub.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_message_stream_consumption() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let mut stream = bus.message_stream(SubjectFilter::subject("Mailbox"));

        bus.send(Message::new("Mailbox").with_str(PartKey::Name, "alice"))
            .await;

        let message = timeout(Duration::from_millis(200), stream.next())
            .await
            .expect("timeout")
            .expect("stream item");
        assert_eq!(message.get_str(&PartKey::Name), Some("alice"));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_subscribers() {
        let bus = Arc::new(InMemoryMessageBus::new());
        let mut first = bus.subscribe(SubjectFilter::subject("Mailbox"));
        let mut second = bus.subscribe(SubjectFilter::subject("Mailbox"));

        let receivers = bus.send(Message::new("Mailbox")).await;
        assert_eq!(receivers, 2);

        for sub in [&mut first, &mut second] {
            let message = timeout(Duration::from_millis(200), sub.recv())
                .await
                .expect("timeout")
                .expect("message");
            assert_eq!(message.subject(), "Mailbox");
        }
    }
}
