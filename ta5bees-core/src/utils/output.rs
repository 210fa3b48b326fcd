use std::{cell::RefCell, io::Write, rc::Rc};

/// Where the console built-in sends each printed line.
pub trait OutputIO {
    fn write_line(&self, line: String);
}

#[derive(Debug, Clone, Copy)]
pub struct StdoutOutputIO;

impl OutputIO for StdoutOutputIO {
    fn write_line(&self, line: String) {
        let mut stdout = std::io::stdout().lock();

        // a closed stdout is not the program's failure
        let _ = writeln!(stdout, "{line}");
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NullOutputIO;

impl OutputIO for NullOutputIO {
    fn write_line(&self, _line: String) {}
}

/// Collects printed lines in memory. Clones share one buffer.
#[derive(Debug, Default, Clone)]
pub struct VectorOutputIO {
    lines: Rc<RefCell<Vec<String>>>
}

impl VectorOutputIO {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains everything printed so far.
    pub fn take(&self) -> Vec<String> {
        self.lines.take()
    }
}

impl OutputIO for VectorOutputIO {
    fn write_line(&self, line: String) {
        self.lines.borrow_mut().push(line);
    }
}

/// Handle to the sink a program prints to.
#[derive(Clone)]
pub struct Output {
    sink: Rc<dyn OutputIO>
}

impl Output {
    pub fn new(sink: Rc<dyn OutputIO>) -> Self {
        Self { sink }
    }

    pub fn stdout() -> Self {
        Self::new(Rc::new(StdoutOutputIO))
    }

    pub fn null() -> Self {
        Self::new(Rc::new(NullOutputIO))
    }

    pub fn write_line(&self, line: String) {
        self.sink.write_line(line);
    }
}
