//! scall End-to-End Smoke Test
//!
//! Drives the built-in catalog through the process dispatcher:
//!   Part A. Resolution: preload, lazy load, unknown and malformed names
//!   Part B. Files: open/write/lseek/read/fsync/close, stat, rename, link, unlink
//!   Part C. Directories and tolerant variants
//!   Part D. Sockets: loopback TCP connect/accept/send/recv
//!   Part E. Errors: failure record, usage errors, io::Error bridge, stats
//!
//! Run: ./target/release/scall-smoke
//! (SCALL_LOG_LEVEL=debug shows loads as they happen)

use scall::{call, codes, dispatcher, CallArgs, ErrorClass, Outcome, Value};

use std::net::SocketAddr;
use std::path::PathBuf;

// ── Test harness ──

struct TestRunner {
    total: usize,
    passed: usize,
    failed: usize,
}

const LINE: &str = "────────────────────────────────────────────────────────────";

impl TestRunner {
    fn new() -> Self {
        Self { total: 0, passed: 0, failed: 0 }
    }

    fn section(&self, name: &str) {
        println!("\n{}", LINE);
        println!("  {}", name);
        println!("{}", LINE);
    }

    fn pass(&mut self, name: &str) {
        self.total += 1;
        self.passed += 1;
        println!("  [{:2}] {:<52} PASS", self.total, name);
    }

    fn fail(&mut self, name: &str, reason: &str) {
        self.total += 1;
        self.failed += 1;
        println!("  [{:2}] {:<52} FAIL: {}", self.total, name, reason);
    }

    fn check(&mut self, name: &str, ok: bool, reason: &str) {
        if ok { self.pass(name); } else { self.fail(name, reason); }
    }

    fn summary(&self) {
        println!("\n{}", LINE);
        println!(
            "  Total: {}  Passed: {}  Failed: {}",
            self.total, self.passed, self.failed
        );
        println!("{}", LINE);
    }
}

fn scratch(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("scall-smoke-{}-{}", std::process::id(), tag))
}

/// Run `name` and pull an fd out of a `Done` result.
fn call_fd(name: &str, args: CallArgs) -> Result<i32, String> {
    match call(name, args) {
        Ok(Outcome::Done(Value::Fd(fd))) => Ok(fd),
        Ok(other) => Err(format!("unexpected {:?}", other)),
        Err(e) => Err(e.to_string()),
    }
}

// ════════════════════════════════════════════════════════════
// Part A: Resolution
// ════════════════════════════════════════════════════════════

fn test_resolution(t: &mut TestRunner) {
    t.section("Part A: Resolution");

    let d = dispatcher();
    let available = d.available();
    t.check("catalog lists 29 operations", available.len() == 29, &format!("{}", available.len()));

    let pre = scall::preload(&["open", "close"]);
    t.check(
        "preload open, close",
        pre.is_ok() && d.is_resolved("open") && d.is_resolved("close"),
        &format!("{:?}", pre.err()),
    );

    let before = d.is_resolved("getsockname");
    let _ = d.resolve("getsockname");
    t.check(
        "lazy resolve getsockname",
        !before && d.is_resolved("getsockname"),
        "state did not change",
    );

    let unknown = call("frobnicate", CallArgs::new());
    t.check(
        "unknown name → Resolve class",
        matches!(&unknown, Err(e) if e.class() == ErrorClass::Resolve),
        &format!("{:?}", unknown),
    );

    let bad = call("Open", CallArgs::new());
    t.check(
        "malformed name → Resolve class",
        matches!(&bad, Err(e) if e.class() == ErrorClass::Resolve),
        &format!("{:?}", bad),
    );
}

// ════════════════════════════════════════════════════════════
// Part B: Files
// ════════════════════════════════════════════════════════════

fn test_files(t: &mut TestRunner) {
    t.section("Part B: Files");

    let path = scratch("file");
    let flags = (libc::O_RDWR | libc::O_CREAT | libc::O_TRUNC | libc::O_CLOEXEC) as i64;
    let fd = match call_fd("open", CallArgs::new().path(&path).int(flags).int(0o600)) {
        Ok(fd) => { t.pass("open O_CREAT"); fd }
        Err(e) => { t.fail("open O_CREAT", &e); return; }
    };

    let wrote = call("write", CallArgs::new().fd(fd).bytes(b"scall smoke".to_vec()));
    t.check("write 11 bytes", matches!(wrote, Ok(Outcome::Done(Value::Count(11)))), &format!("{:?}", wrote));

    let seek = call("lseek", CallArgs::new().fd(fd).int(0).int(libc::SEEK_SET as i64));
    t.check("lseek to 0", matches!(seek, Ok(Outcome::Done(Value::Count(0)))), &format!("{:?}", seek));

    let read = call("read", CallArgs::new().fd(fd).int(64));
    let ok = matches!(&read, Ok(Outcome::Done(Value::Bytes(b))) if b.as_slice() == b"scall smoke");
    t.check("read back", ok, &format!("{:?}", read));

    let sync = call("fsync", CallArgs::new().fd(fd));
    t.check("fsync", sync.is_ok(), &format!("{:?}", sync));

    let closed = call("close", CallArgs::new().fd(fd));
    t.check("close", closed.is_ok(), &format!("{:?}", closed));

    let st = call("stat", CallArgs::new().path(&path));
    let ok = matches!(&st, Ok(Outcome::Done(Value::Stat(s))) if s.is_file() && s.size == 11);
    t.check("stat size 11", ok, &format!("{:?}", st));

    let moved = scratch("file-moved");
    let renamed = call("rename", CallArgs::new().path(&path).path(&moved));
    t.check("rename", renamed.is_ok() && !path.exists(), &format!("{:?}", renamed));

    let hard = scratch("file-link");
    let linked = call("link", CallArgs::new().path(&moved).path(&hard));
    let nlink = call("stat", CallArgs::new().path(&moved))
        .ok()
        .and_then(Outcome::done)
        .and_then(|v| v.as_stat().map(|s| s.nlink));
    t.check("link → nlink 2", linked.is_ok() && nlink == Some(2), &format!("{:?}", nlink));

    let soft = scratch("file-symlink");
    let _ = call("symlink", CallArgs::new().path(&moved).path(&soft));
    let l = call("lstat", CallArgs::new().path(&soft));
    let ok = matches!(&l, Ok(Outcome::Done(Value::Stat(s))) if s.is_symlink());
    t.check("symlink + lstat", ok, &format!("{:?}", l));

    let chmod = call("chmod", CallArgs::new().path(&moved).int(0o640));
    t.check("chmod 0640", chmod.is_ok(), &format!("{:?}", chmod));

    let mut cleaned = true;
    for p in [&soft, &hard, &moved] {
        cleaned &= call("unlink", CallArgs::new().path(p)).is_ok();
    }
    t.check("unlink x3", cleaned, "unlink failed");
}

// ════════════════════════════════════════════════════════════
// Part C: Directories and tolerant variants
// ════════════════════════════════════════════════════════════

fn test_dirs(t: &mut TestRunner) {
    t.section("Part C: Directories and tolerant variants");

    let dir = scratch("dir");
    let args = CallArgs::new().path(&dir).int(0o755);

    let created = call("mkdir_if_missing", args.clone());
    t.check("mkdir_if_missing → Done", matches!(created, Ok(Outcome::Done(_))), &format!("{:?}", created));

    let existed = call("mkdir_if_missing", args.clone());
    t.check(
        "mkdir_if_missing again → Tolerated(EEXIST)",
        matches!(&existed, Ok(o) if o.tolerated_errno() == Some(codes::EEXIST)),
        &format!("{:?}", existed),
    );

    let plain = call("mkdir", args);
    t.check(
        "mkdir again → Os(EEXIST)",
        matches!(&plain, Err(e) if e.errno() == Some(codes::EEXIST)),
        &format!("{:?}", plain),
    );

    let file = dir.join("f");
    let _ = std::fs::write(&file, b"x");
    let full = call("rmdir_if_exists", CallArgs::new().path(&dir));
    t.check(
        "rmdir_if_exists non-empty → Os error",
        matches!(&full, Err(e) if e.class() == ErrorClass::Os),
        &format!("{:?}", full),
    );

    let removed = call("unlink_if_exists", CallArgs::new().path(&file));
    let absent = call("unlink_if_exists", CallArgs::new().path(&file));
    t.check(
        "unlink_if_exists removed vs absent",
        matches!(removed, Ok(Outcome::Done(_)))
            && matches!(&absent, Ok(o) if o.tolerated_errno() == Some(codes::ENOENT)),
        &format!("{:?} / {:?}", removed, absent),
    );

    let gone = call("rmdir_if_exists", CallArgs::new().path(&dir));
    let again = call("rmdir_if_exists", CallArgs::new().path(&dir));
    t.check(
        "rmdir_if_exists removed vs absent",
        matches!(gone, Ok(Outcome::Done(_)))
            && matches!(&again, Ok(o) if o.tolerated_errno() == Some(codes::ENOENT)),
        &format!("{:?} / {:?}", gone, again),
    );

    let cd = call("chdir", CallArgs::new().path(&dir));
    t.check(
        "chdir into removed dir → ENOENT",
        matches!(&cd, Err(e) if e.errno() == Some(codes::ENOENT)),
        &format!("{:?}", cd),
    );
}

// ════════════════════════════════════════════════════════════
// Part D: Sockets
// ════════════════════════════════════════════════════════════

fn tcp_socket() -> Result<i32, String> {
    call_fd(
        "socket",
        CallArgs::new()
            .int(libc::AF_INET as i64)
            .int(libc::SOCK_STREAM as i64)
            .int(0),
    )
}

fn test_sockets(t: &mut TestRunner) {
    t.section("Part D: Sockets (loopback TCP)");

    let listener = match tcp_socket() {
        Ok(fd) => { t.pass("socket AF_INET/SOCK_STREAM"); fd }
        Err(e) => { t.fail("socket AF_INET/SOCK_STREAM", &e); return; }
    };

    let any: SocketAddr = SocketAddr::from(([127, 0, 0, 1], 0));
    let bound = call("bind", CallArgs::new().fd(listener).addr(any));
    let listening = call("listen", CallArgs::new().fd(listener).int(8));
    t.check("bind + listen", bound.is_ok() && listening.is_ok(), &format!("{:?} {:?}", bound, listening));

    let local = call("getsockname", CallArgs::new().fd(listener))
        .ok()
        .and_then(Outcome::done)
        .and_then(|v| v.as_addr());
    let addr = match local {
        Some(a) if a.port() != 0 => { t.pass("getsockname → ephemeral port"); a }
        other => {
            t.fail("getsockname → ephemeral port", &format!("{:?}", other));
            let _ = call("close", CallArgs::new().fd(listener));
            return;
        }
    };

    let client = match tcp_socket() {
        Ok(fd) => fd,
        Err(e) => { t.fail("client socket", &e); return; }
    };

    let unconnected = call("shutdown_if_connected", CallArgs::new().fd(client).int(libc::SHUT_RDWR as i64));
    t.check(
        "shutdown_if_connected unconnected → Tolerated(ENOTCONN)",
        matches!(&unconnected, Ok(o) if o.tolerated_errno() == Some(codes::ENOTCONN)),
        &format!("{:?}", unconnected),
    );

    let connected = call("connect", CallArgs::new().fd(client).addr(addr));
    t.check("connect", connected.is_ok(), &format!("{:?}", connected));

    let server = match call_fd("accept", CallArgs::new().fd(listener)) {
        Ok(fd) => { t.pass("accept"); fd }
        Err(e) => { t.fail("accept", &e); return; }
    };

    let sent = call("send", CallArgs::new().fd(client).bytes(b"ping".to_vec()).int(0));
    let got = call("recv", CallArgs::new().fd(server).int(16).int(0));
    let ok = matches!(sent, Ok(Outcome::Done(Value::Count(4))))
        && matches!(&got, Ok(Outcome::Done(Value::Bytes(b))) if b.as_slice() == b"ping");
    t.check("send / recv", ok, &format!("{:?}", got));

    let shut = call("shutdown_if_connected", CallArgs::new().fd(client).int(libc::SHUT_RDWR as i64));
    t.check("shutdown_if_connected connected → Done", matches!(shut, Ok(Outcome::Done(_))), &format!("{:?}", shut));

    for fd in [server, client, listener] {
        let _ = call("close", CallArgs::new().fd(fd));
    }
}

// ════════════════════════════════════════════════════════════
// Part E: Errors and stats
// ════════════════════════════════════════════════════════════

fn test_errors(t: &mut TestRunner) {
    t.section("Part E: Errors and stats");

    let missing = scratch("missing");
    let args = CallArgs::new().path(&missing);
    match call("rmdir", args.clone()) {
        Err(e) => {
            let f = e.failure();
            t.check(
                "failure record: op, errno, args",
                f.map(|f| f.op() == "rmdir" && f.errno() == codes::ENOENT && f.args() == &args)
                    .unwrap_or(false),
                &e.to_string(),
            );
            let wrapped = e.clone().into_io_error();
            t.check(
                "into_io_error keeps the failure record",
                wrapped.kind() == std::io::ErrorKind::NotFound
                    && wrapped.get_ref().map_or(false, |r| r.to_string().starts_with("rmdir(")),
                &format!("{:?}", wrapped),
            );
            let io_err: std::io::Error = e.into();
            t.check(
                "io::Error keeps raw errno",
                io_err.raw_os_error() == Some(libc::ENOENT),
                &format!("{:?}", io_err),
            );
        }
        Ok(o) => t.fail("failure record: op, errno, args", &format!("unexpected {:?}", o)),
    }

    let usage = call("open", CallArgs::new().path(&missing));
    t.check(
        "short argument list → Usage class",
        matches!(&usage, Err(e) if e.class() == ErrorClass::Usage),
        &format!("{:?}", usage),
    );

    let errno_before = std::io::Error::last_os_error().raw_os_error();
    let _ = call("close", CallArgs::new().fd(-1));
    let errno_after = std::io::Error::last_os_error().raw_os_error();
    t.check("caller errno untouched", errno_before == errno_after, &format!("{:?} → {:?}", errno_before, errno_after));

    let stats = scall::stats("rmdir_if_exists");
    t.check(
        "stats: rmdir_if_exists counted",
        stats.map_or(false, |s| s.calls == 3 && s.tolerated == 1 && s.failures == 1),
        &format!("{:?}", stats),
    );

    println!("\n  resolved: {}", dispatcher().resolved().join(", "));
}

fn main() {
    println!("=== scall End-to-End Smoke Test ===");
    scall::init_logging();

    let mut t = TestRunner::new();

    test_resolution(&mut t);
    test_files(&mut t);
    test_dirs(&mut t);
    test_sockets(&mut t);
    test_errors(&mut t);

    t.summary();
    std::process::exit(if t.failed > 0 { 1 } else { 0 });
}
