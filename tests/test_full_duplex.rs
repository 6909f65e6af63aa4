// ABOUTME: Full-duplex console behavior: local echo, line editing, submit and reply turn-taking

mod common;

use common::{sent, widget};
use pretty_assertions::assert_eq;
use ws_repl::config::ReplMode;
use ws_repl::repl::ReplWidget;
use ws_repl::terminal::ChannelEvent;
use ws_repl::transcript::LineRole;

fn open_widget(capacity: usize) -> ReplWidget<common::FakeChannel> {
    let mut widget = widget(ReplMode::FullDuplex, capacity);
    widget.open();
    widget.handle_channel_event(ChannelEvent::Opened);
    widget
}

fn type_text<C: ws_repl::terminal::Channel>(widget: &mut ReplWidget<C>, text: &str) {
    for c in text.chars() {
        widget.on_character(c);
    }
}

#[test]
fn test_starts_with_one_empty_input_line() {
    let widget = widget(ReplMode::FullDuplex, 10);
    assert_eq!(widget.transcript().texts(), vec![""]);
    assert_eq!(widget.transcript().current().unwrap().role(), LineRole::Sent);
}

#[test]
fn test_connects_to_bare_host_port_without_handshake() {
    let widget = open_widget(10);
    assert_eq!(widget.connection().channel().opened, vec!["ws://127.0.0.1:8765"]);
    assert!(sent(&widget).is_empty());
}

#[test]
fn test_submit_sends_line_and_opens_new_one() {
    let mut widget = open_widget(10);
    type_text(&mut widget, "hi");
    assert!(sent(&widget).is_empty(), "typing must not transmit");

    widget.on_submit();

    assert_eq!(sent(&widget), ["hi"]);
    assert_eq!(widget.transcript().texts(), vec!["hi", ""]);
    assert_eq!(widget.pane().markup, "<span style=\"color:white\">hi</span>\n<span style=\"color:white\"></span>\n$ ");
}

#[test]
fn test_backspace_edits_current_line() {
    let mut widget = open_widget(10);
    type_text(&mut widget, "abc");
    widget.on_backspace();
    widget.on_backspace();

    assert_eq!(widget.transcript().current().unwrap().text(), "a");
}

#[test]
fn test_backspace_never_touches_sealed_lines() {
    let mut widget = open_widget(10);
    type_text(&mut widget, "ls");
    widget.on_submit();

    widget.on_backspace();
    widget.on_backspace();

    assert_eq!(widget.transcript().texts(), vec!["ls", ""]);
}

#[test]
fn test_markup_characters_round_trip_through_editing() {
    let mut widget = open_widget(10);
    type_text(&mut widget, "echo \"<a&b>\"!");
    widget.on_backspace();

    assert_eq!(widget.transcript().current().unwrap().content(), "echo &quot;&lt;a&amp;b&gt;&quot;");
    widget.on_submit();
    assert_eq!(sent(&widget), ["echo \"<a&b>\""]);
}

#[test]
fn test_reply_replaces_pending_line() {
    let mut widget = open_widget(10);
    type_text(&mut widget, "2+2");
    widget.on_submit();
    widget.handle_channel_event(ChannelEvent::Data("4".into()));

    let roles: Vec<LineRole> = widget.transcript().lines().map(|l| l.role()).collect();
    assert_eq!(widget.transcript().texts(), vec!["2+2", "4", ""]);
    assert_eq!(roles, vec![LineRole::Sent, LineRole::Received, LineRole::Sent]);
}

#[test]
fn test_exactly_one_open_line_after_each_turn() {
    let mut widget = open_widget(50);
    for turn in 0..5 {
        type_text(&mut widget, &format!("cmd {turn}"));
        widget.on_submit();
        assert_eq!(widget.transcript().current().unwrap().text(), "");
        widget.ingest(&format!("out {turn}"));
        assert_eq!(widget.transcript().current().unwrap().text(), "");
        assert_eq!(widget.transcript().current().unwrap().role(), LineRole::Sent);
    }
    assert_eq!(widget.transcript().len(), 11);
}

#[test]
fn test_submit_while_closed_is_dropped() {
    let mut widget = widget(ReplMode::FullDuplex, 10);
    type_text(&mut widget, "lost");
    widget.on_submit();

    assert!(sent(&widget).is_empty());
    assert_eq!(widget.transcript().texts(), vec!["lost", ""]);
}

#[test]
fn test_capacity_applies_to_submitted_lines() {
    let mut widget = open_widget(3);
    for cmd in ["a", "b", "c", "d"] {
        type_text(&mut widget, cmd);
        widget.on_submit();
        assert!(widget.transcript().len() <= 3);
    }
    assert_eq!(widget.transcript().texts(), vec!["c", "d", ""]);
    assert_eq!(sent(&widget), ["a", "b", "c", "d"]);
}
