mod cmp;
mod copy;
mod reduce;

pub(crate) fn lcg_rand_step(state: &mut u32) {
    *state = (*state as u64 * 279470273u64 % 0xfffffffb) as u32;
}

pub(crate) fn policies() -> Vec<crate::ExecPolicy> {
    vec![
        crate::ExecPolicy::single_task(),
        crate::ExecPolicy { available_cores: 3, strict: false, profiling: false },
        crate::ExecPolicy { available_cores: 8, strict: true, profiling: true },
    ]
}
