// runtime/fault.rs
//
// Unrecoverable interpreter faults
// - report the fault value on the console, flushing every line
// - the diagnostic is formatted on the stack: the heap may be what failed
// - restart the device; nothing is salvaged

use core::fmt::Write;

use arrayvec::ArrayString;

use crate::error::RuntimeFault;
use crate::hal::Machine;
use crate::log::log_fatal;

pub fn fatal<M: Machine + ?Sized>(machine: &mut M, fault: RuntimeFault) -> ! {
    log_fatal("fault", &diagnostic(&fault));
    machine.restart()
}

/// `"<reason>, val=0x…"`; a reason too long for the buffer is replaced.
pub fn diagnostic(fault: &RuntimeFault) -> ArrayString<64> {
    let mut line = ArrayString::<64>::new();
    if write!(line, "{}, val={:#x}", fault.reason, fault.value).is_err() {
        line.clear();
        let _ = write!(line, "runtime fault, val={:#x}", fault.value);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_names_the_value() {
        let line = diagnostic(&RuntimeFault::nlr_jump_failed(0x3ffb_0010));
        assert_eq!(line.as_str(), "NLR jump failed, val=0x3ffb0010");
    }

    #[test]
    fn long_reasons_keep_the_value() {
        let reason = "a reason that is far too long to fit in the fixed diagnostic buffer";
        let line = diagnostic(&RuntimeFault::new(1, reason));
        assert_eq!(line.as_str(), "runtime fault, val=0x1");
    }
}
