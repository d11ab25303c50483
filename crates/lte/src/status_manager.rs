use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
    /// An interactive prompt; never expires while it is shown.
    Prompt,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub expires_at: Option<Instant>,
}

impl StatusMessage {
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// The message bar's content and its expiry.
#[derive(Debug, Clone)]
pub struct StatusManager {
    current_message: Option<StatusMessage>,
    timeout: Duration,
}

impl StatusManager {
    pub fn new(timeout: Duration) -> Self {
        Self {
            current_message: None,
            timeout,
        }
    }

    fn show(&mut self, message_type: MessageType, content: String) {
        let expires_at = match message_type {
            MessageType::Prompt => None,
            _ => Some(Instant::now() + self.timeout),
        };
        log::debug!("Status ({:?}): {}", message_type, content);
        self.current_message = Some(StatusMessage {
            content,
            message_type,
            expires_at,
        });
    }

    pub fn set_info(&mut self, message: String) {
        self.show(MessageType::Info, message);
    }

    pub fn set_warning(&mut self, message: String) {
        self.show(MessageType::Warning, message);
    }

    pub fn set_error(&mut self, message: String) {
        self.show(MessageType::Error, message);
    }

    pub fn set_prompt(&mut self, message: String) {
        self.show(MessageType::Prompt, message);
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    /// Drops the current message once it has expired.
    pub fn update(&mut self) {
        if self.current_message.as_ref().is_some_and(|m| m.is_expired()) {
            self.current_message = None;
        }
    }

    pub fn get_current_message(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn has_message(&self) -> bool {
        self.current_message.is_some()
    }
}

impl Default for StatusManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_message_types() {
        let mut manager = StatusManager::default();
        assert!(!manager.has_message());

        manager.set_info("saved".to_string());
        let message = manager.get_current_message().unwrap();
        assert_eq!(message.message_type, MessageType::Info);
        assert_eq!(message.content, "saved");

        manager.set_warning("careful".to_string());
        assert_eq!(
            manager.get_current_message().unwrap().message_type,
            MessageType::Warning
        );

        manager.set_error("failed".to_string());
        assert_eq!(
            manager.get_current_message().unwrap().message_type,
            MessageType::Error
        );

        manager.clear();
        assert!(!manager.has_message());
    }

    #[test]
    fn test_prompt_does_not_expire() {
        let mut manager = StatusManager::new(Duration::from_millis(1));
        manager.set_prompt("Search: ".to_string());
        thread::sleep(Duration::from_millis(10));
        manager.update();
        assert!(manager.has_message());
        assert!(manager.get_current_message().unwrap().expires_at.is_none());
    }

    #[test]
    fn test_update_drops_expired_message() {
        let mut manager = StatusManager::new(Duration::from_millis(1));
        manager.set_info("Test".to_string());

        thread::sleep(Duration::from_millis(10));

        manager.update();
        assert!(!manager.has_message());
    }

    #[test]
    fn test_fresh_message_survives_update() {
        let mut manager = StatusManager::new(Duration::from_secs(60));
        manager.set_info("Test".to_string());
        manager.update();
        assert!(manager.has_message());
    }
}
