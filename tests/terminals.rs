//! Console echo, offscreen rendering and display hotkeys.

mod common;

use common::{boot_all, standard_kernel, type_line};
use trios::console::cell_at;
use trios::KernelError;

#[test]
fn typed_characters_echo_on_the_live_page() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();

    type_line(&mut kernel, "ls");
    assert_eq!(cell_at(kernel.console.live(), 0, 0), b'l');
    assert_eq!(cell_at(kernel.console.live(), 1, 0), b's');

    kernel.accept_input_char(0x08);
    assert_eq!(cell_at(kernel.console.live(), 1, 0), b' ');
    assert_eq!(kernel.sessions.session(0).line_len(), 1);
}

#[test]
fn input_goes_to_the_displayed_session_not_the_executing_one() {
    let mut kernel = standard_kernel();
    boot_all(&mut kernel);
    kernel.timer_tick();
    assert_eq!(kernel.sessions.executing, 0);
    assert_eq!(kernel.sessions.displayed, 2);

    type_line(&mut kernel, "cat\n");
    assert_eq!(kernel.sessions.session(0).line_len(), 0);
    assert!(kernel.sessions.session(2).enter_seen);
}

#[test]
fn hotkey_switch_swaps_retained_pages() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();
    type_line(&mut kernel, "abc");

    kernel.request_session_switch(1).unwrap();
    assert_eq!(kernel.sessions.displayed, 1);
    // Terminal 1 starts blank; terminal 0's page is retained.
    assert_eq!(cell_at(kernel.console.live(), 0, 0), b' ');
    assert_eq!(cell_at(&kernel.sessions.session(0).shadow, 0, 0), b'a');

    kernel.request_session_switch(0).unwrap();
    assert_eq!(cell_at(kernel.console.live(), 0, 0), b'a');
    assert_eq!(cell_at(kernel.console.live(), 2, 0), b'c');
}

#[test]
fn hotkey_target_is_bounds_checked() {
    let mut kernel = standard_kernel();
    assert_eq!(
        kernel.request_session_switch(3),
        Err(KernelError::InvalidCommand)
    );
    // Re-selecting the displayed session is a quiet no-op.
    assert!(kernel.request_session_switch(0).is_ok());
}

#[test]
fn offscreen_writes_land_in_the_shadow_page() {
    let mut kernel = standard_kernel();
    boot_all(&mut kernel);
    kernel.timer_tick();
    assert_eq!(kernel.sessions.executing, 0);
    assert_eq!(kernel.sessions.displayed, 2);

    // Terminal 0's program prints while terminal 2 is on screen.
    kernel.write(1, b"bg").unwrap();
    assert_eq!(cell_at(&kernel.sessions.session(0).shadow, 0, 0), b'b');
    assert_eq!(cell_at(kernel.console.live(), 0, 0), b' ');

    // Bringing terminal 0 back shows what it printed.
    kernel.request_session_switch(0).unwrap();
    assert_eq!(cell_at(kernel.console.live(), 0, 0), b'b');
    assert_eq!(cell_at(kernel.console.live(), 1, 0), b'g');
}

#[test]
fn console_window_follows_display_and_schedule() {
    let mut kernel = standard_kernel();
    boot_all(&mut kernel);
    // Executing and displayed agree right after the last bootstrap.
    assert_eq!(
        kernel.mmu.video_entry() & !0xFFF,
        trios::memory::VIDEO_ADDRESS
    );

    // Rotating to terminal 0 while terminal 2 is displayed points the
    // window at terminal 0's retained page.
    kernel.timer_tick();
    assert_eq!(
        kernel.mmu.video_entry() & !0xFFF,
        trios::memory::shadow_phys(0)
    );
}
