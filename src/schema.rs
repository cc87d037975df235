// Hand-written: the table keeps SQLite's implicit `rowid` as its key.

diesel::table! {
    todos (rowid) {
        rowid -> BigInt,
        title -> Nullable<Text>,
        completed -> Nullable<Integer>,
        #[sql_name = "order"]
        position -> Nullable<BigInt>,
    }
}
