#![warn(missing_docs)]
//! # ahhere-app binary
//!
//! Scripted walkthrough of the report flow: mount, capture, map preview,
//! and mail handoff, printed as status lines.

use std::sync::Arc;

use ahhere_app::{app_version, project_runtime_status, report_to_mail, screen_map_resolver};
use ahhere_core::GeoFix;
use ahhere_platform::{
    RecordingMailComposer, ScriptedCameraService, ScriptedLocationService,
    ScriptedPermissionService,
};
use ahhere_report::CaptureWorkflow;
use ahhere_ui::ReportScreenState;

fn main() {
    println!("ahhere-app {}", app_version());

    let dublin = match GeoFix::new(53.3498, -6.2603) {
        Ok(fix) => fix,
        Err(error) => {
            eprintln!("demo fix rejected: {error}");
            std::process::exit(1);
        }
    };

    let composer = Arc::new(RecordingMailComposer::new(true));
    let mut workflow = CaptureWorkflow::new(
        Arc::new(ScriptedPermissionService::grant_all()),
        Arc::new(ScriptedLocationService::new(vec![Ok(dublin), Ok(dublin)])),
        Arc::new(ScriptedCameraService::capturing("file:///tmp/violation.jpg")),
        composer.clone(),
    );

    let mut screen = ReportScreenState::new(app_version());
    let mut resolver = screen_map_resolver();

    workflow.mount();
    screen.apply_workflow_state(workflow.state());

    let now_ms = 1_700_000_000_000;
    match workflow.open_camera(now_ms) {
        Ok(outcome) => screen.apply_outcome(outcome),
        Err(error) => {
            screen.apply_error(&error);
            eprintln!("capture failed: {error}");
            std::process::exit(1);
        }
    }
    screen.apply_workflow_state(workflow.state());

    if let Some(report) = workflow.report()
        && let Some(fix) = report.location
    {
        match resolver.resolve(&fix) {
            Ok(url) => println!("map: {url}"),
            Err(error) => eprintln!("map resolution failed: {error}"),
        }
        screen.apply_map_state(resolver.state());
        println!("tap: {}", resolver.tap_text(&fix));
    }

    match workflow.send() {
        Ok(message) => {
            println!("mailto: {}", message.mailto_url());
            if let Some(report) = workflow.report() {
                match report_to_mail(report) {
                    Ok(rendered) => println!("body:\n{}", rendered.body),
                    Err(error) => eprintln!("payload render failed: {error}"),
                }
            }
        }
        Err(error) => {
            screen.apply_error(&error);
            eprintln!("send failed: {error}");
        }
    }

    let status = project_runtime_status(&screen);
    println!(
        "phase={} camera_allowed={} send_allowed={} status={}",
        status.phase, status.camera_allowed, status.send_allowed, status.status
    );
}
