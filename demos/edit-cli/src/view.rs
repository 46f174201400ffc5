//! What the terminal shows. Every command moves through
//! `Idle -> Loading -> (ImageReady | VideoReady | Error)`.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Idle,
    Loading(String),
    ImageReady { url: String },
    VideoReady { url: String, duration: Option<f64> },
    Error(String),
}

impl View {
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            View::ImageReady { .. } | View::VideoReady { .. } | View::Error(_)
        )
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Idle => Ok(()),
            View::Loading(what) => write!(f, "... {what}"),
            View::ImageReady { url } => write!(f, "edited image: {url}"),
            View::VideoReady { url, duration: Some(d) } => {
                write!(f, "edited video ({d:.1}s): {url}")
            }
            View::VideoReady { url, duration: None } => write!(f, "edited video: {url}"),
            View::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// Holds the current view and prints each change.
#[derive(Debug, Default)]
pub struct Shell {
    view: Option<View>,
}

impl Shell {
    pub fn show(&mut self, next: View) {
        match &next {
            View::Idle => {}
            View::Error(_) => eprintln!("{next}"),
            _ => println!("{next}"),
        }
        self.view = Some(next);
    }

    pub fn view(&self) -> &View {
        self.view.as_ref().unwrap_or(&View::Idle)
    }
}
