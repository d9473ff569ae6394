//! Contracts of the dialog and notification surfaces the console drives

use log::debug;

/// Kind of notification, shown as the alert icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// The product dialog
pub trait Modal {
    fn show(&self);
    fn hide(&self);
}

/// The toast/alert surface
pub trait Notifier {
    fn fire(&self, text: &str, kind: NoticeKind);
}

/// Dialog stand-in for a terminal: there is nothing to draw, so it only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalModal;

impl Modal for TerminalModal {
    fn show(&self) {
        debug!("product dialog shown");
    }

    fn hide(&self) {
        debug!("product dialog hidden");
    }
}

/// Prints notifications, errors to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn fire(&self, text: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Success => println!("✔ {}", text),
            NoticeKind::Info => println!("ℹ {}", text),
            NoticeKind::Error => eprintln!("✖ {}", text),
        }
    }
}
