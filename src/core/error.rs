/// Scenario validation failures raised before any projection work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    /// Retirement age precedes the current age.
    #[error("退職年齢は現在の年齢以上である必要があります。")]
    InvalidRetirementAge,
    /// Life-expectancy age does not exceed the current age.
    #[error("シミュレーションの最終年齢は現在の年齢より大きく設定してください。")]
    InvalidLifeExpectancy,
    /// The last projected calendar year does not fit in an `i32`.
    #[error("開始年が計算可能な範囲を超えています。")]
    BaseYearOutOfRange,
}
