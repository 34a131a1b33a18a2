//! Descriptor-table invariants and device behavior behind read/write.

mod common;

use common::{standard_kernel, type_line};
use trios::memory::{USER_BASE, USER_SPAN};
use trios::syscalls::{dispatch, Syscall, SyscallOutcome};
use trios::KernelError;

#[test]
fn console_pair_is_pinned_and_one_directional() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();

    let mut buf = [0u8; 16];
    // Input side never writes, output side never reads.
    assert_eq!(kernel.read(1, &mut buf), Err(KernelError::InvalidDescriptor));
    assert_eq!(kernel.write(0, b"x"), Err(KernelError::InvalidDescriptor));
    // Neither slot can be closed.
    assert_eq!(kernel.close(0), Err(KernelError::InvalidDescriptor));
    assert_eq!(kernel.close(1), Err(KernelError::InvalidDescriptor));
}

#[test]
fn out_of_range_and_free_descriptors_are_rejected() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();

    let mut buf = [0u8; 16];
    assert_eq!(kernel.read(-1, &mut buf), Err(KernelError::InvalidDescriptor));
    assert_eq!(kernel.read(8, &mut buf), Err(KernelError::InvalidDescriptor));
    assert_eq!(kernel.read(5, &mut buf), Err(KernelError::InvalidDescriptor));
    assert_eq!(kernel.write(7, b"x"), Err(KernelError::InvalidDescriptor));
    assert_eq!(kernel.close(5), Err(KernelError::InvalidDescriptor));
}

#[test]
fn open_takes_the_lowest_free_slot_and_frees_it_on_close() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();

    assert_eq!(kernel.open(b"frame0.txt").unwrap(), 2);
    assert_eq!(kernel.open(b"rtc").unwrap(), 3);
    assert_eq!(kernel.open(b".").unwrap(), 4);

    kernel.close(3).unwrap();
    assert_eq!(kernel.open(b"frame0.txt").unwrap(), 3);

    // A slot already freed cannot be closed again.
    kernel.close(4).unwrap();
    assert_eq!(kernel.close(4), Err(KernelError::InvalidDescriptor));

    assert_eq!(kernel.open(b"missing"), Err(KernelError::NotFound));
}

#[test]
fn descriptor_table_caps_at_eight_slots() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();

    for _ in 0..6 {
        kernel.open(b"frame0.txt").unwrap();
    }
    assert_eq!(kernel.open(b"frame0.txt"), Err(KernelError::InvalidDescriptor));
}

#[test]
fn regular_file_reads_advance_the_cursor() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();
    let fd = kernel.open(b"frame0.txt").unwrap() as i32;

    let mut buf = [0u8; 8];
    assert_eq!(kernel.read(fd, &mut buf), Ok(Some(8)));
    assert_eq!(&buf, b"Have you");
    assert_eq!(kernel.read(fd, &mut buf), Ok(Some(8)));
    assert_eq!(&buf, b" seen th");

    // Drain the rest; the cursor sticks at the end.
    let mut rest = [0u8; 64];
    assert_eq!(kernel.read(fd, &mut rest), Ok(Some(8)));
    assert_eq!(kernel.read(fd, &mut rest), Ok(Some(0)));
}

#[test]
fn large_file_reads_cross_block_boundaries() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();
    let fd = kernel.open(b"verylarge.txt").unwrap() as i32;

    let mut total = 0;
    let mut buf = [0u8; 1000];
    loop {
        let n = kernel.read(fd, &mut buf).unwrap().unwrap();
        if n == 0 {
            break;
        }
        assert!(buf[..n].iter().all(|&b| b == b'z'));
        total += n;
    }
    assert_eq!(total, 5000);
}

#[test]
fn directory_reads_enumerate_names_then_end() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();
    let fd = kernel.open(b".").unwrap() as i32;

    let mut names = Vec::new();
    let mut buf = [0u8; 33];
    loop {
        let n = kernel.read(fd, &mut buf).unwrap().unwrap();
        if n == 0 {
            break;
        }
        names.push(String::from_utf8_lossy(&buf[..n]).into_owned());
    }
    assert_eq!(
        names,
        vec![".", "rtc", "shell", "counter", "fish", "frame0.txt", "verylarge.txt"]
    );
}

#[test]
fn the_filesystem_is_read_only() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();
    let file = kernel.open(b"frame0.txt").unwrap() as i32;
    let dir = kernel.open(b".").unwrap() as i32;

    assert_eq!(kernel.write(file, b"graffiti"), Err(KernelError::Unsupported));
    assert_eq!(kernel.write(dir, b"graffiti"), Err(KernelError::Unsupported));
}

#[test]
fn terminal_read_blocks_until_a_line_is_submitted() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();

    let mut buf = [0u8; 128];
    assert_eq!(
        dispatch(&mut kernel, Syscall::Read { fd: 0, buf: &mut buf }),
        SyscallOutcome::Blocked
    );

    type_line(&mut kernel, "hi\n");
    assert_eq!(
        dispatch(&mut kernel, Syscall::Read { fd: 0, buf: &mut buf }),
        SyscallOutcome::Done(3)
    );
    assert_eq!(&buf[..3], b"hi\n");

    // The line was consumed; the next read waits again.
    assert_eq!(
        dispatch(&mut kernel, Syscall::Read { fd: 0, buf: &mut buf }),
        SyscallOutcome::Blocked
    );
}

#[test]
fn rtc_read_blocks_until_a_virtual_tick() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();
    let fd = kernel.open(b"rtc").unwrap() as i32;

    let mut buf = [0u8; 4];
    // Default rate is 2 Hz, one virtual tick per 512 real ones.
    assert_eq!(kernel.read(fd, &mut buf), Ok(None));
    for _ in 0..511 {
        kernel.rtc_tick();
        assert_eq!(kernel.read(fd, &mut buf), Ok(None));
    }
    kernel.rtc_tick();
    assert_eq!(kernel.read(fd, &mut buf), Ok(Some(0)));
    assert_eq!(kernel.read(fd, &mut buf), Ok(None));
}

#[test]
fn rtc_write_installs_a_frequency() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();
    let fd = kernel.open(b"rtc").unwrap() as i32;

    assert_eq!(kernel.write(fd, &1024u32.to_le_bytes()), Ok(4));
    kernel.rtc_tick();
    let mut buf = [0u8; 4];
    assert_eq!(kernel.read(fd, &mut buf), Ok(Some(0)));

    // Only powers of two at sane rates, delivered as exactly 4 bytes.
    assert_eq!(
        kernel.write(fd, &3u32.to_le_bytes()),
        Err(KernelError::InvalidCommand)
    );
    assert_eq!(kernel.write(fd, b"\x02"), Err(KernelError::InvalidCommand));
}

#[test]
fn closing_the_rtc_disables_its_channel() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();
    let fd = kernel.open(b"rtc").unwrap() as i32;
    assert!(kernel.rtc.is_enabled(0));

    kernel.close(fd).unwrap();
    assert!(!kernel.rtc.is_enabled(0));
}

#[test]
fn halt_closes_descriptors_through_their_hooks() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();
    kernel.execute(b"counter").unwrap();
    kernel.open(b"rtc").unwrap();
    assert!(kernel.rtc.is_enabled(0));

    kernel.halt(0).unwrap();
    assert!(!kernel.rtc.is_enabled(0));
}

#[test]
fn vidmap_validates_the_caller_pointer() {
    let mut kernel = standard_kernel();
    kernel.timer_tick();

    assert_eq!(
        kernel.vidmap(USER_BASE - 4),
        Err(KernelError::InvalidAddress)
    );
    assert_eq!(
        kernel.vidmap(USER_BASE + USER_SPAN),
        Err(KernelError::InvalidAddress)
    );
    assert_eq!(kernel.vidmap(USER_BASE + 0x1000), Ok(USER_BASE + USER_SPAN));
}
