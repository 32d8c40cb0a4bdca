mod redis;

pub use crate::redis::RedisQueueService;
