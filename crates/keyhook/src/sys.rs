//! Win32 low-level keyboard hook (`WH_KEYBOARD_LL`) integration.
//!
//! The hook procedure runs on the thread that installed it, and only while
//! that thread pumps messages. We therefore install from a dedicated thread
//! that does nothing but run `GetMessageW`. Stopping posts `WM_QUIT` to that
//! thread; the loop exits, the hook is removed, and the interceptor dropped.
//!
//! Events we synthesized ourselves carry `eventtag::DOCKFOCUS_TAG` in
//! `dwExtraInfo` and are passed through untouched.

use std::{
    ffi::c_void,
    sync::atomic::{AtomicIsize, AtomicU32, Ordering},
};

use crossbeam_channel::Sender;
use keycode::{Modifier, modifiers_from_bits};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, warn};
use windows::{
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        System::{LibraryLoader::GetModuleHandleW, Threading::GetCurrentThreadId},
        UI::{
            Input::KeyboardAndMouse::{GetAsyncKeyState, VK_CONTROL, VK_LWIN, VK_RWIN, VK_SHIFT},
            WindowsAndMessaging::{
                CallNextHookEx, DispatchMessageW, GetMessageW, HHOOK, KBDLLHOOKSTRUCT,
                LLKHF_ALTDOWN, MSG, PM_NOREMOVE, PeekMessageW, PostThreadMessageW,
                SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx, WH_KEYBOARD_LL,
                WM_KEYDOWN, WM_KEYUP, WM_QUIT, WM_SYSKEYDOWN, WM_SYSKEYUP,
            },
        },
    },
    core::PCWSTR,
};

use crate::{Error, HookDecision, Interceptor, KeyEvent, KeyTransition, Result};

// The hook procedure has no user-data slot, so its state is process-global.
static INTERCEPTOR: Lazy<Mutex<Option<Interceptor>>> = Lazy::new(|| Mutex::new(None));
static HOOK: AtomicIsize = AtomicIsize::new(0);

// Shared control handle to stop the hook thread's message loop.
pub(crate) struct SysControl {
    thread_id: AtomicU32,
}

impl SysControl {
    pub(crate) fn new() -> Self {
        Self {
            thread_id: AtomicU32::new(0),
        }
    }

    fn set_thread(&self, id: u32) {
        self.thread_id.store(id, Ordering::SeqCst);
    }

    pub(crate) fn stop(&self) {
        let id = self.thread_id.swap(0, Ordering::SeqCst);
        if id == 0 {
            return;
        }
        if let Err(e) = unsafe { PostThreadMessageW(id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
            warn!(error = %e, "keyhook_stop_post_failed");
        }
    }
}

fn held(vk: u16) -> bool {
    unsafe { GetAsyncKeyState(i32::from(vk)) } < 0
}

fn current_modifiers(kbd: &KBDLLHOOKSTRUCT) -> u8 {
    let mut bits = 0;
    if kbd.flags.0 & LLKHF_ALTDOWN.0 != 0 {
        bits |= Modifier::Alt.bit();
    }
    if held(VK_CONTROL.0) {
        bits |= Modifier::Control.bit();
    }
    if held(VK_SHIFT.0) {
        bits |= Modifier::Shift.bit();
    }
    if held(VK_LWIN.0) || held(VK_RWIN.0) {
        bits |= Modifier::Win.bit();
    }
    bits
}

unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    // Negative codes must be passed on without processing.
    if code < 0 {
        return unsafe { CallNextHookEx(HHOOK::default(), code, wparam, lparam) };
    }

    let transition = match wparam.0 as u32 {
        WM_KEYDOWN | WM_SYSKEYDOWN => Some(KeyTransition::Down),
        WM_KEYUP | WM_SYSKEYUP => Some(KeyTransition::Up),
        _ => None,
    };

    if let Some(transition) = transition {
        let kbd = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };
        let ev = KeyEvent {
            vk: kbd.vkCode as u16,
            transition,
            modifiers: modifiers_from_bits(current_modifiers(kbd)),
            injected: eventtag::is_tagged(kbd.dwExtraInfo),
        };
        let decision = INTERCEPTOR
            .lock()
            .as_mut()
            .map_or(HookDecision::PassThrough, |i| i.on_key_event(&ev));
        if decision == HookDecision::Consume {
            return LRESULT(1);
        }
    }

    unsafe { CallNextHookEx(HHOOK::default(), code, wparam, lparam) }
}

pub(crate) fn run_hook_loop(
    interceptor: Interceptor,
    ready: &Sender<Result<()>>,
    ctrl: &SysControl,
) -> Result<()> {
    {
        let mut slot = INTERCEPTOR.lock();
        if slot.is_some() {
            warn!("keyhook_already_installed");
            let _ignored = ready.send(Err(Error::AlreadyInstalled));
            return Err(Error::AlreadyInstalled);
        }
        *slot = Some(interceptor);
    }

    let mut msg = MSG::default();
    // Force creation of this thread's message queue so WM_QUIT can be posted.
    let _queue = unsafe { PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_NOREMOVE) };
    ctrl.set_thread(unsafe { GetCurrentThreadId() });

    let installed = unsafe { GetModuleHandleW(PCWSTR::null()) }.and_then(|module| unsafe {
        SetWindowsHookExW(
            WH_KEYBOARD_LL,
            Some(keyboard_proc),
            HINSTANCE(module.0),
            0,
        )
    });
    let hook = match installed {
        Ok(h) => h,
        Err(e) => {
            warn!(error = %e, "keyhook_install_failed");
            INTERCEPTOR.lock().take();
            ctrl.set_thread(0);
            let err = Error::OsError(e.to_string());
            let _ignored = ready.send(Err(err.clone()));
            return Err(err);
        }
    };
    HOOK.store(hook.0 as isize, Ordering::SeqCst);

    let _ignored = ready.send(Ok(()));
    debug!("keyhook_message_loop_started");

    while unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) }.0 > 0 {
        unsafe {
            let _translated = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    let raw = HOOK.swap(0, Ordering::SeqCst);
    if raw != 0
        && let Err(e) = unsafe { UnhookWindowsHookEx(HHOOK(raw as *mut c_void)) }
    {
        warn!(error = %e, "keyhook_unhook_failed");
    }
    INTERCEPTOR.lock().take();
    debug!("keyhook_message_loop_exited");
    Ok(())
}
