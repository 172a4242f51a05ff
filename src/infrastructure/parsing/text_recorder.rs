//! Scoped capture of character data
//!
//! A recorder collects every text fragment seen while its owning element is
//! open and hands the sanitized text to its sink once, when that element
//! closes.

/// Trim and collapse runs of whitespace into a single space
pub fn sanitize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug)]
struct ActiveRecording<S> {
    owner_depth: usize,
    text: String,
    sink: S,
}

/// At most one active recording at a time.
///
/// The sink `S` names where the text goes; the owner of the recorder acts
/// on it when `finalize` hands it back.
#[derive(Debug)]
pub struct TextRecorder<S> {
    active: Option<ActiveRecording<S>>,
}

impl<S> Default for TextRecorder<S> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<S> TextRecorder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recording for the element open at `owner_depth`.
    ///
    /// A previous, undelivered recording is discarded and its sink returned.
    pub fn begin(&mut self, owner_depth: usize, sink: S) -> Option<S> {
        self.active
            .replace(ActiveRecording {
                owner_depth,
                text: String::new(),
                sink,
            })
            .map(|previous| previous.sink)
    }

    pub fn append(&mut self, fragment: &str) {
        if let Some(recording) = self.active.as_mut() {
            recording.text.push_str(fragment);
        }
    }

    /// Drop the active recording without delivering it
    pub fn cancel(&mut self) -> Option<S> {
        self.active.take().map(|recording| recording.sink)
    }

    /// Deliver the recording if the element closing at `current_depth` owns it
    pub fn finalize(&mut self, current_depth: usize) -> Option<(S, String)> {
        match &self.active {
            Some(recording) if recording.owner_depth == current_depth => self
                .active
                .take()
                .map(|recording| (recording.sink, sanitize(&recording.text))),
            _ => None,
        }
    }
}
