use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Output shared between the review loop and the presenter it subscribes.
#[derive(Clone)]
pub struct Console {
    sink: Rc<RefCell<Sink>>,
}

enum Sink {
    Stdout(io::Stdout),
    Memory(Vec<u8>),
}

impl Console {
    pub fn stdout() -> Self {
        Self {
            sink: Rc::new(RefCell::new(Sink::Stdout(io::stdout()))),
        }
    }

    /// Captures output in memory; read it back with [`Console::contents`].
    pub fn memory() -> Self {
        Self {
            sink: Rc::new(RefCell::new(Sink::Memory(Vec::new()))),
        }
    }

    pub fn contents(&self) -> String {
        match &*self.sink.borrow() {
            Sink::Memory(buf) => String::from_utf8_lossy(buf).into_owned(),
            Sink::Stdout(_) => String::new(),
        }
    }
}

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.sink.borrow_mut() {
            Sink::Stdout(out) => out.write(buf),
            Sink::Memory(mem) => mem.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.sink.borrow_mut() {
            Sink::Stdout(out) => out.flush(),
            Sink::Memory(_) => Ok(()),
        }
    }
}
