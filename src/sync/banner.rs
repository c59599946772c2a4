//! Header/footer pass-through. No diffing: every mutation emits one combined
//! message, whether or not the value actually changed. Absent values go out as
//! empty text.

use std::sync::Arc;

use crate::error::RosterError;
use crate::protocol::ViewerMessage;
use crate::transport::ViewerTransport;

pub struct Banner {
    header: Option<String>,
    footer: Option<String>,
    transport: Arc<dyn ViewerTransport>,
}

impl Banner {
    pub fn new(transport: Arc<dyn ViewerTransport>) -> Self {
        Self {
            header: None,
            footer: None,
            transport,
        }
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn set_header(&mut self, header: impl Into<String>) -> Result<(), RosterError> {
        self.header = Some(header.into());
        self.push_state()
    }

    pub fn reset_header(&mut self) -> Result<(), RosterError> {
        self.header = None;
        self.push_state()
    }

    pub fn set_footer(&mut self, footer: impl Into<String>) -> Result<(), RosterError> {
        self.footer = Some(footer.into());
        self.push_state()
    }

    pub fn reset_footer(&mut self) -> Result<(), RosterError> {
        self.footer = None;
        self.push_state()
    }

    pub fn set_header_footer(
        &mut self,
        header: impl Into<String>,
        footer: impl Into<String>,
    ) -> Result<(), RosterError> {
        self.header = Some(header.into());
        self.footer = Some(footer.into());
        self.push_state()
    }

    pub fn reset_header_footer(&mut self) -> Result<(), RosterError> {
        self.header = None;
        self.footer = None;
        self.push_state()
    }

    fn push_state(&self) -> Result<(), RosterError> {
        let message = ViewerMessage::HeaderFooter {
            header: self.header.clone().unwrap_or_default(),
            footer: self.footer.clone().unwrap_or_default(),
        };
        self.transport
            .deliver(vec![message])
            .map_err(RosterError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;

    fn banner() -> (Banner, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        (Banner::new(transport.clone()), transport)
    }

    #[test]
    fn every_mutation_emits_combined_message() {
        let (mut banner, transport) = banner();
        banner.set_header("welcome").unwrap();
        banner.set_footer("goodbye").unwrap();
        assert_eq!(
            transport.messages(),
            vec![
                ViewerMessage::HeaderFooter {
                    header: "welcome".to_string(),
                    footer: String::new(),
                },
                ViewerMessage::HeaderFooter {
                    header: "welcome".to_string(),
                    footer: "goodbye".to_string(),
                },
            ]
        );
    }

    #[test]
    fn unchanged_value_still_emits() {
        let (mut banner, transport) = banner();
        banner.set_header("same").unwrap();
        banner.set_header("same").unwrap();
        assert_eq!(transport.batch_count(), 2);
    }

    #[test]
    fn reset_serializes_as_empty_text() {
        let (mut banner, transport) = banner();
        banner.set_header_footer("a", "b").unwrap();
        banner.reset_header_footer().unwrap();
        assert_eq!(
            transport.batches().last().unwrap()[0],
            ViewerMessage::HeaderFooter {
                header: String::new(),
                footer: String::new(),
            }
        );
        assert_eq!(banner.header(), None);
        assert_eq!(banner.footer(), None);
    }
}
