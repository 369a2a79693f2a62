use redis_connection::cache_key;

cache_key!(UserCacheKey::<user_models::User> => "user:{}"[id: i64]);
cache_key!(UserByEmailCacheKey::<user_models::User> => "user:email:{}"[email: str]);
cache_key!(UserListCacheKey::<Vec<user_models::User>> => "users:list");

#[cfg(test)]
mod tests {
    use redis_connection::CacheKey;

    use super::*;

    #[test]
    fn test_user_keys() {
        assert_eq!(UserCacheKey.get_key_with_args((&42,)), "user:42");
        assert_eq!(
            UserByEmailCacheKey.get_key_with_args(("ada@example.com",)),
            "user:email:ada@example.com"
        );
        assert_eq!(UserListCacheKey.get_key(), "users:list");
    }
}
