use libproc::libproc::proc_pid::pidinfo;
use libproc::libproc::task_info::TaskAllInfo;

use super::PlatformExtensions;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn process_priority(pid: u32) -> Option<i32> {
        // Clear errno before call
        unsafe { *libc::__error() = 0 };
        let prio = unsafe { libc::getpriority(libc::PRIO_PROCESS, pid as libc::id_t) };
        // getpriority returns -1 on error, but -1 can also be a valid priority
        let errno = unsafe { *libc::__error() };
        if prio == -1 && errno != 0 {
            None
        } else {
            Some(prio)
        }
    }

    fn process_threads(pid: u32) -> Option<u32> {
        let info = pidinfo::<TaskAllInfo>(i32::try_from(pid).ok()?, 0).ok()?;
        u32::try_from(info.ptinfo.pti_threadnum).ok()
    }
}
