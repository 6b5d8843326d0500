// A small specification suite run through the spectree command line.
// Usage: cargo run --bin spectree-demo -- [--reporter spec] [--only stack] ...

use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use spectree::{spec_assert, spec_assert_eq, AssertionFailure, Suite};

fn main() -> ExitCode {
    let mut suite = Suite::new();

    suite.describe("a stack", |s| {
        let stack: Rc<RefCell<Vec<i32>>> = Rc::default();

        let fresh = stack.clone();
        s.before_each(move || fresh.borrow_mut().clear());

        let st = stack.clone();
        s.it("starts empty", move || -> Result<(), AssertionFailure> {
            spec_assert!(st.borrow().is_empty());
            Ok(())
        });

        s.describe("after a push", |s| {
            let pushed = stack.clone();
            s.before_each(move || pushed.borrow_mut().push(42));

            let st = stack.clone();
            s.it("has one element", move || -> Result<(), AssertionFailure> {
                spec_assert_eq!(st.borrow().len(), 1);
                Ok(())
            });

            let st = stack.clone();
            s.it("pops what was pushed", move || -> Result<(), AssertionFailure> {
                spec_assert_eq!(st.borrow_mut().pop(), Some(42));
                Ok(())
            });
        });
    });

    suite.describe("string formatting", |s| {
        s.it("pads numbers", || -> Result<(), AssertionFailure> {
            spec_assert_eq!(format!("{:03}", 7), "007");
            Ok(())
        });
        s.it_skip("localizes numbers", || ());
    });

    spectree::cli::run(&suite)
}
