use crate::domain::ports::ProgressSink;
use std::sync::{Arc, Mutex};

/// Writes progress lines to stdout next to the logging commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn line(&self, text: &str) {
        println!("{}", text);
    }
}

/// 在記憶體中收集輸出，測試用來檢查沒有 secret 外洩
#[derive(Debug, Clone, Default)]
pub struct BufferedProgress {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }
}

impl ProgressSink for BufferedProgress {
    fn line(&self, text: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_string());
    }
}
