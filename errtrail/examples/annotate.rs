//! # Annotation Demo
//!
//! Builds a few error chains and prints their messages and stack traces.

use errtrail::{
    annotatef, error_stack, is_not_found, not_found, status_code, Error, ResultExt,
};

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== errtrail Annotation Demo ===\n");

    // Example 1: Tracing a present error keeps it, tracing nothing stays nothing
    demo_trace();

    // Example 2: Annotated chain with a classified cause
    demo_classified();

    // Example 3: Foreign errors and reporting
    demo_report();
}

fn demo_trace() {
    println!("--- Demo 1: Trace ---");

    let err1 = Error::from(std::io::Error::other("something wicked this way comes"));
    let err2: Option<Error> = None;

    println!("{:?}", errtrail::trace(err1).map(|e| e.to_string()));
    println!("{:?}", errtrail::trace(err2).map(|e| e.to_string()));
    println!();
}

fn find_user(id: u32) -> errtrail::Result<String> {
    Err(not_found(format!("user {id}")))
}

fn load_profile(id: u32) -> errtrail::Result<String> {
    let name = find_user(id).trace()?;
    Ok(format!("profile of {name}"))
}

fn demo_classified() {
    println!("--- Demo 2: Classified ---");

    let Err(err) = load_profile(42) else {
        return;
    };
    let Some(err) = annotatef!(err, "rendering page {}", "/users/42") else {
        return;
    };

    println!("message:   {err}");
    println!("not found: {}", is_not_found(&err));
    println!("status:    {:?}", status_code(&err));
    println!("stack:\n{}", error_stack(&err));
    println!();
}

fn demo_report() {
    println!("--- Demo 3: Report ---");

    let result = std::fs::read_to_string("/definitely/not/there")
        .annotate("reading settings")
        .log_err();
    if let Err(err) = result {
        println!("details: {}", errtrail::details(&err));
    }
}
