use events_models::Event;
use redis_connection::cache_key;

cache_key!(EventCacheKey::<Event> => "event:{}"[id: i64]);
cache_key!(EventListCacheKey::<Vec<Event>> => "events:list");

#[cfg(test)]
mod tests {
    use redis_connection::CacheKey;

    use super::*;

    #[test]
    fn test_event_keys() {
        assert_eq!(EventCacheKey.get_key_with_args((&7,)), "event:7");
        assert_eq!(EventListCacheKey.get_key(), "events:list");
    }
}
