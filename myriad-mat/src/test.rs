mod shape;

pub(crate) fn lcg_rand_step(state: &mut u32) {
    *state = (*state as u64 * 279470273u64 % 0xfffffffb) as u32;
}
