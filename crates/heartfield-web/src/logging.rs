use std::io;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::FmtSubscriber;

/// Buffers one formatted event and hands it to the console on drop.
#[derive(Default)]
pub struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let line = text.trim_end();
        if !line.is_empty() {
            emit(line);
        }
    }
}

pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::default()
    }
}

fn emit(line: &str) {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line));
        } else {
            eprintln!("{line}");
        }
    }
}

/// Installs a fmt subscriber that writes to the browser console. Timestamps
/// are left out; the console adds its own.
pub fn init() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter("info")
        .with_ansi(false)
        .without_time()
        .with_writer(ConsoleMakeWriter)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
